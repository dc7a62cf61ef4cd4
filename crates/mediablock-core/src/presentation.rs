//! Render state, asset display and resize handling for one block.
//!
//! `Presentation` owns the surface (and through it every live node and
//! listener), the render state, the resize session and the aspect ratio of
//! the loaded asset. It never touches persisted data; the coordinator reads
//! measurements from it at save time.
//!
//! # State machine
//!
//! ```text
//!   Empty ──begin_upload/display──▶ Uploading ──media ready──▶ Filled
//!     ▲                                │                         │
//!     └──── upload failed / media error┴─────────────────────────┘
//! ```

use crate::dimension::{AspectRatio, CssWidth, MediaSize, SavedWidth};
use crate::media::MediaKind;
use crate::resize::{ResizeHandle, ResizeState};
use crate::state::RenderState;
use crate::surface::{MediaSurface, PlatformError, SurfaceEvent, SurfaceLayout};

pub struct Presentation<S> {
    surface: S,
    state: RenderState,
    resize: ResizeState,
    aspect_ratio: Option<AspectRatio>,
    /// Width to apply once the current asset is ready.
    pending_width: Option<SavedWidth>,
    media: Option<MediaKind>,
    read_only: bool,
    caption_enabled: bool,
    handles_mounted: bool,
    torn_down: bool,
}

impl<S: MediaSurface> Presentation<S> {
    pub fn new(surface: S, read_only: bool, caption_enabled: bool) -> Self {
        Self {
            surface,
            state: RenderState::Empty,
            resize: ResizeState::Idle,
            aspect_ratio: None,
            pending_width: None,
            media: None,
            read_only,
            caption_enabled,
            handles_mounted: false,
            torn_down: false,
        }
    }

    /// Build the node tree and enter the `Empty` state.
    pub fn build(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError> {
        self.surface.build(layout)?;
        self.set_state(RenderState::Empty);
        Ok(())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn resize_state(&self) -> &ResizeState {
        &self.resize
    }

    pub fn aspect_ratio(&self) -> Option<AspectRatio> {
        self.aspect_ratio
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        self.media
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn caption_enabled(&self) -> bool {
        self.caption_enabled
    }

    fn set_state(&mut self, state: RenderState) {
        if self.state != state {
            tracing::debug!(from = ?self.state, to = ?state, "render state");
        }
        self.state = state;
        self.surface.set_render_state(state);
    }

    /// `Empty → Uploading`: show the preloader, optionally over a preview.
    pub fn begin_upload(&mut self, preview: Option<&str>) {
        self.surface.show_preloader(preview);
        self.set_state(RenderState::Uploading);
    }

    pub fn set_upload_trigger_visible(&mut self, visible: bool) {
        if !self.read_only {
            self.surface.set_upload_trigger_visible(visible);
        }
    }

    /// Display an asset. The block stays `Uploading` until the media element
    /// reports ready.
    pub fn display(&mut self, url: &str, saved_width: Option<SavedWidth>) -> Result<(), PlatformError> {
        self.end_resize();

        let kind = MediaKind::from_url(url);
        self.pending_width = saved_width;
        self.aspect_ratio = None;

        if let Err(e) = self.surface.mount_media(kind, url) {
            tracing::warn!(%url, "could not mount media: {e}");
            self.media = None;
            self.reset_to_empty();
            return Err(e);
        }

        self.media = Some(kind);
        self.surface.show_preloader(Some(url));
        self.set_state(RenderState::Uploading);
        Ok(())
    }

    /// The media element is ready: `Uploading → Filled`.
    pub fn media_ready(&mut self) {
        if self.media.is_none() || self.torn_down {
            return;
        }

        self.set_state(RenderState::Filled);
        self.set_upload_trigger_visible(false);

        self.aspect_ratio = self.surface.natural_size().and_then(AspectRatio::from_natural);
        if self.aspect_ratio.is_none() {
            tracing::debug!("media reported no intrinsic size");
        }

        let width = self
            .pending_width
            .map(SavedWidth::css_width)
            .unwrap_or(CssWidth::Natural);
        self.surface.apply_width(width);

        if !self.read_only && !self.handles_mounted {
            match self.surface.mount_resize_handles() {
                Ok(()) => self.handles_mounted = true,
                Err(e) => tracing::warn!("could not create resize handles: {e}"),
            }
        }

        self.surface.hide_preloader();
    }

    /// The media element failed to load: discard it and go back to `Empty`.
    pub fn media_error(&mut self) {
        if self.media.is_none() || self.torn_down {
            return;
        }
        tracing::warn!("media failed to load, discarding element");
        self.reset_to_empty();
    }

    /// An upload failed: go back to `Empty` with the trigger visible.
    pub fn upload_failed(&mut self) {
        self.reset_to_empty();
    }

    fn reset_to_empty(&mut self) {
        self.end_resize();
        if self.media.take().is_some() {
            self.surface.remove_media();
        }
        self.aspect_ratio = None;
        self.pending_width = None;
        self.surface.hide_preloader();
        self.set_state(RenderState::Empty);
        self.set_upload_trigger_visible(true);
    }

    /// Pointer-down on a handle. Returns whether a session started.
    pub fn begin_resize(&mut self, handle: ResizeHandle) -> bool {
        if self.read_only || self.state != RenderState::Filled || self.torn_down {
            return false;
        }
        let Some(rect) = self.surface.media_rect() else {
            return false;
        };
        if !self.resize.begin(handle, rect) {
            return false;
        }
        if let Err(e) = self.surface.capture_pointer() {
            tracing::warn!("could not capture pointer for resize: {e}");
            self.resize.end();
            return false;
        }
        tracing::debug!(handle = handle.as_str(), width = rect.width, "resize started");
        true
    }

    /// Pointer move during a session. Returns the applied width, or `None`
    /// when no session is active.
    pub fn drag_to(&mut self, pointer_x: f64) -> Option<f64> {
        if !self.resize.is_dragging() {
            return None;
        }
        let rect = self.surface.media_rect()?;
        let width = self.resize.drag(rect, pointer_x)?;
        self.surface.apply_width(CssWidth::Pixels(width));
        Some(width)
    }

    /// Pointer release: end the session and stop tracking the pointer.
    pub fn end_resize(&mut self) {
        if let Some(session) = self.resize.end() {
            self.surface.release_pointer();
            tracing::debug!(handle = session.handle.as_str(), "resize ended");
        }
    }

    /// Route a platform event. `UploadRequested` is the coordinator's concern
    /// and is ignored here.
    pub fn handle_event(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::MediaReady => self.media_ready(),
            SurfaceEvent::MediaError => self.media_error(),
            SurfaceEvent::HandlePressed(handle) => {
                self.begin_resize(handle);
            }
            SurfaceEvent::PointerMoved { x } => {
                self.drag_to(x);
            }
            SurfaceEvent::PointerReleased => self.end_resize(),
            SurfaceEvent::UploadRequested => {}
        }
    }

    /// Current rendered size of the media, if it is displayed.
    pub fn rendered_size(&self) -> Option<MediaSize> {
        if self.state != RenderState::Filled {
            return None;
        }
        self.surface
            .media_rect()
            .map(|rect| MediaSize::new(rect.width, rect.height))
    }

    pub fn container_width(&self) -> f64 {
        self.surface.container_width()
    }

    /// Caption text, or `None` when captions are disabled for this block.
    pub fn caption(&self) -> Option<String> {
        self.caption_enabled.then(|| self.surface.caption_text())
    }

    pub fn set_modifier(&mut self, modifier: &str, enabled: bool) {
        self.surface.set_modifier(modifier, enabled);
    }

    /// Detach every listener. Further events are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.end_resize();
        self.surface.teardown();
        self.torn_down = true;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }
}
