//! Drag-to-resize state machine.
//!
//! A resize session lives from pointer-down on one of the two edge handles to
//! pointer-up anywhere in the document. While it lives, every pointer move is
//! turned into a new element width measured from the dragged edge:
//!
//! - left handle: `offset = rect.left - pointer_x`
//! - right handle: `offset = pointer_x - rect.right`
//!
//! and `width = max(rect.width + offset, MIN_MEDIA_WIDTH)`. Height is never
//! computed here; the surface sets it to `auto` so the media scales with its
//! own aspect ratio.

use crate::dimension::MIN_MEDIA_WIDTH;

/// Which edge handle started the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    Left,
    Right,
}

impl ResizeHandle {
    pub const ALL: [ResizeHandle; 2] = [ResizeHandle::Left, ResizeHandle::Right];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeHandle::Left => "left",
            ResizeHandle::Right => "right",
        }
    }
}

/// Bounding box of an element, viewport-relative, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Width produced by dragging `handle` to `pointer_x` against the element's
/// current bounding box.
pub fn resized_width(handle: ResizeHandle, current: Rect, pointer_x: f64) -> f64 {
    let offset = match handle {
        ResizeHandle::Left => current.left - pointer_x,
        ResizeHandle::Right => pointer_x - current.right(),
    };
    (current.width + offset).max(MIN_MEDIA_WIDTH)
}

/// One press-to-release drag interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    pub handle: ResizeHandle,
    /// Element box when the drag started.
    pub start_rect: Rect,
}

/// Whether a drag is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ResizeState {
    #[default]
    Idle,
    Dragging(ResizeSession),
}

impl ResizeState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, ResizeState::Dragging(_))
    }

    pub fn session(&self) -> Option<&ResizeSession> {
        match self {
            ResizeState::Idle => None,
            ResizeState::Dragging(session) => Some(session),
        }
    }

    /// Start a session. Refused while another session is active.
    pub fn begin(&mut self, handle: ResizeHandle, start_rect: Rect) -> bool {
        if self.is_dragging() {
            tracing::debug!(
                handle = handle.as_str(),
                "resize already in progress, ignoring pointer-down"
            );
            return false;
        }
        *self = ResizeState::Dragging(ResizeSession { handle, start_rect });
        true
    }

    /// New width for a pointer move, or `None` when idle.
    pub fn drag(&self, current: Rect, pointer_x: f64) -> Option<f64> {
        let session = self.session()?;
        Some(resized_width(session.handle, current, pointer_x))
    }

    /// End the session, returning it if one was active.
    pub fn end(&mut self) -> Option<ResizeSession> {
        match std::mem::take(self) {
            ResizeState::Idle => None,
            ResizeState::Dragging(session) => Some(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> Rect {
        Rect::new(100.0, 0.0, 200.0, 100.0)
    }

    #[test]
    fn test_left_handle_grows_when_pointer_moves_left() {
        let r = rect();
        // Pointer 40px left of the left edge.
        assert_eq!(resized_width(ResizeHandle::Left, r, r.left - 40.0), 240.0);
        // Pointer 40px inside the left edge shrinks.
        assert_eq!(resized_width(ResizeHandle::Left, r, r.left + 40.0), 160.0);
    }

    #[test]
    fn test_right_handle_grows_when_pointer_moves_right() {
        let r = rect();
        assert_eq!(resized_width(ResizeHandle::Right, r, r.right() + 40.0), 240.0);
        assert_eq!(resized_width(ResizeHandle::Right, r, r.right() - 50.0), 150.0);
    }

    #[test]
    fn test_width_clamps_to_minimum() {
        let r = rect();
        assert_eq!(
            resized_width(ResizeHandle::Right, r, r.left),
            MIN_MEDIA_WIDTH
        );
        assert_eq!(
            resized_width(ResizeHandle::Left, r, r.right() + 500.0),
            MIN_MEDIA_WIDTH
        );
        // Exactly at the minimum is not clamped further.
        assert_eq!(
            resized_width(ResizeHandle::Right, r, r.left + MIN_MEDIA_WIDTH),
            MIN_MEDIA_WIDTH
        );
    }

    #[test]
    fn test_move_while_idle_is_noop() {
        let state = ResizeState::Idle;
        assert_eq!(state.drag(rect(), 500.0), None);
    }

    #[test]
    fn test_single_active_session() {
        let mut state = ResizeState::default();
        assert!(state.begin(ResizeHandle::Left, rect()));
        assert!(!state.begin(ResizeHandle::Right, rect()));
        assert_eq!(state.session().unwrap().handle, ResizeHandle::Left);

        let ended = state.end().unwrap();
        assert_eq!(ended.handle, ResizeHandle::Left);
        assert_eq!(ended.start_rect, rect());
        assert!(!state.is_dragging());
        assert_eq!(state.end(), None);
    }

    #[test]
    fn test_drag_uses_current_rect() {
        let mut state = ResizeState::default();
        state.begin(ResizeHandle::Right, rect());
        let moved = Rect::new(100.0, 0.0, 260.0, 130.0);
        assert_eq!(state.drag(moved, moved.right() + 10.0), Some(270.0));
    }
}
