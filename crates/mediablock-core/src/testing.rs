//! Recording surface and host doubles for unit tests.

use std::cell::RefCell;
use std::collections::BTreeSet;

use crate::dimension::{CssWidth, MediaSize};
use crate::host::{HostApi, NotifyStyle};
use crate::media::MediaKind;
use crate::resize::Rect;
use crate::state::RenderState;
use crate::surface::{ButtonLayout, CaptionLayout, MediaSurface, PlatformError, SurfaceLayout};

pub fn layout(read_only: bool) -> SurfaceLayout {
    SurfaceLayout {
        read_only,
        caption: (!read_only).then(|| CaptionLayout {
            text: String::new(),
            placeholder: "Caption".into(),
        }),
        button: ButtonLayout::Label("Select an Image".into()),
    }
}

/// A surface that lays media out like a browser would: left edge pinned,
/// height following the intrinsic aspect ratio.
#[derive(Debug)]
pub struct MockSurface {
    pub built: Option<SurfaceLayout>,
    pub state_classes: Vec<RenderState>,
    pub preloader: Option<String>,
    pub trigger_visible: bool,
    pub trigger_listeners: usize,
    pub media: Option<MediaKind>,
    pub mounted_urls: Vec<String>,
    pub media_listeners: usize,
    pub handles: usize,
    pub handle_listeners: usize,
    pub natural: (f64, f64),
    pub container: f64,
    pub left: f64,
    pub width: CssWidth,
    pub pointer_captured: bool,
    pub captures: usize,
    pub releases: usize,
    pub caption: String,
    pub modifiers: BTreeSet<String>,
    pub torn_down: bool,
    /// Report a zero-sized box, as a detached element would.
    pub detached: bool,
    pub fail_mount: bool,
}

impl MockSurface {
    pub fn new(container: f64, natural: (f64, f64)) -> Self {
        Self {
            built: None,
            state_classes: Vec::new(),
            preloader: None,
            trigger_visible: false,
            trigger_listeners: 0,
            media: None,
            mounted_urls: Vec::new(),
            media_listeners: 0,
            handles: 0,
            handle_listeners: 0,
            natural,
            container,
            left: 100.0,
            width: CssWidth::Natural,
            pointer_captured: false,
            captures: 0,
            releases: 0,
            caption: String::new(),
            modifiers: BTreeSet::new(),
            torn_down: false,
            detached: false,
            fail_mount: false,
        }
    }

    pub fn live_listeners(&self) -> usize {
        let drag = if self.pointer_captured { 2 } else { 0 };
        self.trigger_listeners + self.media_listeners + self.handle_listeners + drag
    }

    fn rendered_width(&self) -> f64 {
        match self.width {
            CssWidth::Natural => self.natural.0,
            other => other.resolve_px(self.container),
        }
    }
}

impl MediaSurface for MockSurface {
    fn build(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError> {
        if !layout.read_only {
            self.trigger_visible = true;
            self.trigger_listeners = 1;
        }
        if let Some(caption) = &layout.caption {
            self.caption = caption.text.clone();
        }
        self.built = Some(layout.clone());
        Ok(())
    }

    fn set_render_state(&mut self, state: RenderState) {
        self.state_classes = vec![state];
    }

    fn show_preloader(&mut self, preview: Option<&str>) {
        self.preloader = Some(preview.unwrap_or_default().to_string());
    }

    fn hide_preloader(&mut self) {
        self.preloader = None;
    }

    fn set_upload_trigger_visible(&mut self, visible: bool) {
        self.trigger_visible = visible;
    }

    fn mount_media(&mut self, kind: MediaKind, url: &str) -> Result<(), PlatformError> {
        if self.fail_mount {
            return Err("mount refused".into());
        }
        self.media = Some(kind);
        self.mounted_urls.push(url.to_string());
        self.media_listeners = 2;
        self.width = CssWidth::Natural;
        Ok(())
    }

    fn remove_media(&mut self) {
        self.media = None;
        self.media_listeners = 0;
    }

    fn mount_resize_handles(&mut self) -> Result<(), PlatformError> {
        self.handles = 2;
        self.handle_listeners = 2;
        Ok(())
    }

    fn natural_size(&self) -> Option<MediaSize> {
        self.media
            .map(|_| MediaSize::new(self.natural.0, self.natural.1))
    }

    fn media_rect(&self) -> Option<Rect> {
        self.media?;
        if self.detached {
            return Some(Rect::default());
        }
        let width = self.rendered_width();
        let height = width * self.natural.1 / self.natural.0;
        Some(Rect::new(self.left, 0.0, width, height))
    }

    fn container_width(&self) -> f64 {
        if self.detached { 0.0 } else { self.container }
    }

    fn apply_width(&mut self, width: CssWidth) {
        self.width = width;
    }

    fn capture_pointer(&mut self) -> Result<(), PlatformError> {
        self.pointer_captured = true;
        self.captures += 1;
        Ok(())
    }

    fn release_pointer(&mut self) {
        self.pointer_captured = false;
        self.releases += 1;
    }

    fn caption_text(&self) -> String {
        self.caption.clone()
    }

    fn set_modifier(&mut self, modifier: &str, enabled: bool) {
        if enabled {
            self.modifiers.insert(modifier.to_string());
        } else {
            self.modifiers.remove(modifier);
        }
    }

    fn teardown(&mut self) {
        self.trigger_listeners = 0;
        self.media_listeners = 0;
        self.handle_listeners = 0;
        self.pointer_captured = false;
        self.torn_down = true;
    }
}

/// Host that records notifications.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub notices: RefCell<Vec<(String, NotifyStyle)>>,
}

impl HostApi for RecordingHost {
    fn notify(&self, message: &str, style: NotifyStyle) {
        self.notices.borrow_mut().push((message.to_string(), style));
    }
}
