//! Which subtree of the block is visible.

/// Render state of a block. Exactly one is active; the surface reflects it as
/// a single modifier class on the wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    /// No asset: the upload trigger is shown.
    #[default]
    Empty,
    /// Upload in flight or asset still loading: the preloader is shown.
    Uploading,
    /// Asset loaded: media, caption and resize handles are shown.
    Filled,
}

impl RenderState {
    pub const ALL: [RenderState; 3] = [
        RenderState::Empty,
        RenderState::Uploading,
        RenderState::Filled,
    ];

    /// Modifier suffix used for the wrapper class (`image-tool--<suffix>`).
    pub fn modifier(self) -> &'static str {
        match self {
            RenderState::Empty => "empty",
            RenderState::Uploading => "uploading",
            RenderState::Filled => "filled",
        }
    }
}
