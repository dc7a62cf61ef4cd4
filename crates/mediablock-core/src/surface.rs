//! Platform abstraction for the block's rendered nodes.
//!
//! The browser implementation drives real DOM nodes; tests use a recording
//! double. The presentation logic only ever talks to this trait, so every
//! state transition and resize computation is exercised without a browser.
//!
//! Events flow the other way through [`SurfaceEvent`]: the platform layer
//! forwards media ready/error, handle presses and document pointer events to
//! the block, which decides what they mean.

use crate::dimension::{CssWidth, MediaSize};
use crate::media::MediaKind;
use crate::resize::{Rect, ResizeHandle};
use crate::state::RenderState;

/// CSS class names used by the block's own nodes.
pub mod css {
    pub const WRAPPER: &str = "image-tool";
    pub const IMAGE_CONTAINER: &str = "image-tool__image";
    pub const PRELOADER: &str = "image-tool__image-preloader";
    pub const PICTURE: &str = "image-tool__image-picture";
    pub const CAPTION: &str = "image-tool__caption";
    pub const RESIZE_HANDLE: &str = "image-tool__resize-handle";

    /// `image-tool--<modifier>` for states and tunes.
    pub fn wrapper_modifier(modifier: &str) -> String {
        format!("{WRAPPER}--{modifier}")
    }

    /// `image-tool__resize-handle--left` / `--right`.
    pub fn handle_modifier(side: &str) -> String {
        format!("{RESIZE_HANDLE}--{side}")
    }
}

/// Error type for platform operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl From<&str> for PlatformError {
    fn from(s: &str) -> Self {
        PlatformError(s.to_string())
    }
}

impl From<String> for PlatformError {
    fn from(s: String) -> Self {
        PlatformError(s)
    }
}

/// Everything the surface needs to build its static node tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceLayout {
    pub read_only: bool,
    /// Caption node contents, or `None` when captions are disabled.
    pub caption: Option<CaptionLayout>,
    /// Upload trigger label or custom markup. Ignored in read-only mode.
    pub button: ButtonLayout,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLayout {
    pub text: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ButtonLayout {
    /// Translated plain-text label.
    Label(String),
    /// Caller-supplied markup.
    Html(String),
}

/// Events delivered by the platform layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The media element fired its ready event (`load` / `loadeddata`).
    MediaReady,
    /// The media element failed to load.
    MediaError,
    /// Pointer-down on one of the resize handles.
    HandlePressed(ResizeHandle),
    /// Document-level pointer move while the pointer is captured.
    PointerMoved { x: f64 },
    /// Document-level pointer release while the pointer is captured.
    PointerReleased,
    /// The upload trigger was clicked.
    UploadRequested,
}

/// Platform-specific node operations for one block instance.
///
/// Implementations own every node and every listener they create. Listeners
/// must be tracked explicitly so that [`MediaSurface::teardown`] can detach
/// all of them without relying on node removal.
pub trait MediaSurface {
    /// Build the static node tree: wrapper, image container, preloader,
    /// caption (if enabled) and upload trigger (unless read-only).
    fn build(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError>;

    /// Reflect the render state as exactly one wrapper modifier class.
    fn set_render_state(&mut self, state: RenderState);

    /// Show the preloader, optionally with a preview image behind it.
    fn show_preloader(&mut self, preview: Option<&str>);

    fn hide_preloader(&mut self);

    fn set_upload_trigger_visible(&mut self, visible: bool);

    /// Insert a media element for `url`, replacing any previous one.
    ///
    /// Listeners bound to the previous element are detached first; the new
    /// element gets exactly one ready listener and one error listener.
    fn mount_media(&mut self, kind: MediaKind, url: &str) -> Result<(), PlatformError>;

    /// Detach the media element's listeners and remove it from the tree.
    fn remove_media(&mut self);

    /// Create the left and right resize handles. Called at most once.
    fn mount_resize_handles(&mut self) -> Result<(), PlatformError>;

    /// Intrinsic size of the loaded media (natural image size or video
    /// dimensions).
    fn natural_size(&self) -> Option<MediaSize>;

    /// Current bounding box of the media element.
    fn media_rect(&self) -> Option<Rect>;

    /// Reference width percentages are resolved against.
    fn container_width(&self) -> f64;

    /// Set the media width and leave height to `auto`.
    fn apply_width(&mut self, width: CssWidth);

    /// Start delivering document-level pointer move/release events.
    fn capture_pointer(&mut self) -> Result<(), PlatformError>;

    /// Stop delivering document-level pointer events.
    fn release_pointer(&mut self);

    /// Current caption text.
    fn caption_text(&self) -> String;

    /// Toggle a wrapper modifier class for a tune.
    fn set_modifier(&mut self, modifier: &str, enabled: bool);

    /// Detach every listener this surface registered.
    fn teardown(&mut self);
}
