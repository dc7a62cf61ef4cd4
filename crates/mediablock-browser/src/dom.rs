//! `MediaSurface` over real DOM nodes.

use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use mediablock_core::media::MediaKind;
use mediablock_core::surface::{ButtonLayout, css};
use mediablock_core::{
    CssWidth, MediaSize, MediaSurface, PlatformError, Rect, RenderState, ResizeHandle,
    StyleClasses, SurfaceEvent, SurfaceLayout,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlElement, HtmlImageElement, HtmlVideoElement};

use crate::listeners::{ListenerGroup, ListenerSet};

/// Receives events raised by DOM listeners.
pub type EventSink = Rc<dyn Fn(SurfaceEvent)>;

pub(crate) fn js_err(e: JsValue) -> PlatformError {
    PlatformError(format!("{e:?}"))
}

fn create(document: &Document, tag: &str, classes: &[&str]) -> Result<HtmlElement, PlatformError> {
    let el = document
        .create_element(tag)
        .map_err(js_err)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| PlatformError::from("created element is not an HtmlElement"))?;
    for class in classes.iter().filter(|c| !c.is_empty()) {
        el.class_list().add_1(class).map_err(js_err)?;
    }
    Ok(el)
}

pub struct DomSurface {
    document: Document,
    sink: EventSink,
    styles: StyleClasses,
    wrapper: Option<HtmlElement>,
    image_container: Option<HtmlElement>,
    preloader: Option<HtmlElement>,
    caption: Option<HtmlElement>,
    button: Option<HtmlElement>,
    media: Option<(MediaKind, HtmlElement)>,
    handles: Vec<HtmlElement>,
    listeners: ListenerSet,
}

impl DomSurface {
    pub fn new(document: Document, sink: EventSink, styles: StyleClasses) -> Self {
        Self {
            document,
            sink,
            styles,
            wrapper: None,
            image_container: None,
            preloader: None,
            caption: None,
            button: None,
            media: None,
            handles: Vec::new(),
            listeners: ListenerSet::new(),
        }
    }

    /// Root node, available after `build`.
    pub fn element(&self) -> Option<&HtmlElement> {
        self.wrapper.as_ref()
    }

    pub fn media_element(&self) -> Option<&HtmlElement> {
        self.media.as_ref().map(|(_, el)| el)
    }

    pub fn handle_elements(&self) -> &[HtmlElement] {
        &self.handles
    }

    pub fn listeners(&self) -> &ListenerSet {
        &self.listeners
    }

    fn emit(&self, event: SurfaceEvent) -> impl Fn(&web_sys::Event) + 'static {
        let sink = self.sink.clone();
        move |_| sink(event)
    }

    fn container(&self) -> Result<&HtmlElement, PlatformError> {
        self.image_container
            .as_ref()
            .ok_or_else(|| PlatformError::from("surface not built"))
    }
}

fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let style = el.style();
    let result = if value.is_empty() {
        style.remove_property(property).map(|_| ())
    } else {
        style.set_property(property, value)
    };
    if let Err(e) = result {
        tracing::warn!(property, "style update failed: {:?}", e);
    }
}

fn px(style: &web_sys::CssStyleDeclaration, property: &str) -> f64 {
    style
        .get_property_value(property)
        .ok()
        .and_then(|v| v.trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

impl MediaSurface for DomSurface {
    fn build(&mut self, layout: &SurfaceLayout) -> Result<(), PlatformError> {
        let doc = &self.document;
        let wrapper = create(doc, "div", &[self.styles.block.as_str(), css::WRAPPER])?;
        let container = create(doc, "div", &[css::IMAGE_CONTAINER])?;
        let preloader = create(doc, "div", &[css::PRELOADER])?;
        set_style(&preloader, "display", "none");
        container.append_child(&preloader).map_err(js_err)?;
        wrapper.append_child(&container).map_err(js_err)?;

        if let Some(caption) = &layout.caption {
            let el = create(doc, "div", &[self.styles.input.as_str(), css::CAPTION])?;
            el.set_content_editable(if layout.read_only { "false" } else { "true" });
            el.set_attribute("data-placeholder", &caption.placeholder)
                .map_err(js_err)?;
            el.set_inner_html(&caption.text);
            wrapper.append_child(&el).map_err(js_err)?;
            self.caption = Some(el);
        }

        if !layout.read_only {
            let button = create(doc, "div", &[self.styles.button.as_str()])?;
            match &layout.button {
                ButtonLayout::Label(label) => button.set_text_content(Some(label.as_str())),
                ButtonLayout::Html(html) => button.set_inner_html(html),
            }
            let listener =
                EventListener::new(&button, "click", self.emit(SurfaceEvent::UploadRequested));
            self.listeners.add(ListenerGroup::Trigger, listener);
            wrapper.append_child(&button).map_err(js_err)?;
            self.button = Some(button);
        }

        self.wrapper = Some(wrapper);
        self.image_container = Some(container);
        self.preloader = Some(preloader);
        Ok(())
    }

    fn set_render_state(&mut self, state: RenderState) {
        let Some(wrapper) = &self.wrapper else { return };
        let classes = wrapper.class_list();
        for s in RenderState::ALL {
            let name = css::wrapper_modifier(s.modifier());
            if let Err(e) = classes.toggle_with_force(&name, s == state) {
                tracing::warn!("could not toggle {name}: {:?}", e);
            }
        }

        // Only the current state's subtree is shown.
        if let Some(preloader) = &self.preloader {
            let shown = state == RenderState::Uploading;
            set_style(preloader, "display", if shown { "" } else { "none" });
        }
        if state == RenderState::Filled {
            self.set_upload_trigger_visible(false);
        }
    }

    fn show_preloader(&mut self, preview: Option<&str>) {
        if let Some(preloader) = &self.preloader {
            let value = preview.map(|url| format!("url(\"{url}\")")).unwrap_or_default();
            set_style(preloader, "background-image", &value);
        }
    }

    fn hide_preloader(&mut self) {
        if let Some(preloader) = &self.preloader {
            set_style(preloader, "background-image", "");
        }
    }

    fn set_upload_trigger_visible(&mut self, visible: bool) {
        if let Some(button) = &self.button {
            set_style(button, "display", if visible { "" } else { "none" });
        }
    }

    fn mount_media(&mut self, kind: MediaKind, url: &str) -> Result<(), PlatformError> {
        self.remove_media();

        let el = create(&self.document, kind.tag_name(), &[css::PICTURE])?;
        for (name, value) in kind.attributes() {
            el.set_attribute(name, value).map_err(js_err)?;
        }
        set_style(&el, "height", "auto");

        let ready = EventListener::new(&el, kind.ready_event(), self.emit(SurfaceEvent::MediaReady));
        let error = EventListener::new(&el, "error", self.emit(SurfaceEvent::MediaError));
        self.listeners.add(ListenerGroup::Media, ready);
        self.listeners.add(ListenerGroup::Media, error);

        match kind {
            MediaKind::Image => {
                if let Some(img) = el.dyn_ref::<HtmlImageElement>() {
                    img.set_src(url);
                }
            }
            MediaKind::Video => {
                if let Some(video) = el.dyn_ref::<HtmlVideoElement>() {
                    // The attribute alone does not mute for autoplay purposes.
                    video.set_muted(true);
                    video.set_src(url);
                }
            }
        }

        let container = self.container()?;
        let inserted = match &self.preloader {
            Some(preloader) => {
                let anchor: &web_sys::Node = preloader;
                container.insert_before(&el, Some(anchor))
            }
            None => container.append_child(&el),
        };
        inserted.map_err(js_err)?;

        self.media = Some((kind, el));
        Ok(())
    }

    fn remove_media(&mut self) {
        self.listeners.clear(ListenerGroup::Media);
        if let Some((_, el)) = self.media.take() {
            el.remove();
        }
    }

    fn mount_resize_handles(&mut self) -> Result<(), PlatformError> {
        if !self.handles.is_empty() {
            return Ok(());
        }
        for handle in ResizeHandle::ALL {
            let modifier = css::handle_modifier(handle.as_str());
            let el = create(&self.document, "div", &[css::RESIZE_HANDLE, modifier.as_str()])?;
            let sink = self.sink.clone();
            let listener = EventListener::new_with_options(
                &el,
                "pointerdown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    event.prevent_default();
                    event.stop_propagation();
                    sink(SurfaceEvent::HandlePressed(handle));
                },
            );
            self.listeners.add(ListenerGroup::Handles, listener);
            self.container()?.append_child(&el).map_err(js_err)?;
            self.handles.push(el);
        }
        Ok(())
    }

    fn natural_size(&self) -> Option<MediaSize> {
        let (kind, el) = self.media.as_ref()?;
        let (w, h) = match kind {
            MediaKind::Image => {
                let img = el.dyn_ref::<HtmlImageElement>()?;
                (img.natural_width(), img.natural_height())
            }
            MediaKind::Video => {
                let video = el.dyn_ref::<HtmlVideoElement>()?;
                (video.video_width(), video.video_height())
            }
        };
        Some(MediaSize::new(w as f64, h as f64))
    }

    fn media_rect(&self) -> Option<Rect> {
        let (_, el) = self.media.as_ref()?;
        let r = el.get_bounding_client_rect();
        Some(Rect::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn container_width(&self) -> f64 {
        // Percentage widths resolve against the container's content box.
        let Some(container) = &self.image_container else {
            return 0.0;
        };
        let padding = web_sys::window()
            .and_then(|w| w.get_computed_style(container).ok().flatten())
            .map_or(0.0, |style| {
                px(&style, "padding-left") + px(&style, "padding-right")
            });
        (container.client_width() as f64 - padding).max(0.0)
    }

    fn apply_width(&mut self, width: CssWidth) {
        if let Some((_, el)) = &self.media {
            set_style(el, "width", &width.to_css());
        }
    }

    fn capture_pointer(&mut self) -> Result<(), PlatformError> {
        self.listeners.clear(ListenerGroup::Drag);

        let sink = self.sink.clone();
        let moved = EventListener::new(&self.document, "pointermove", move |event| {
            if let Some(pointer) = event.dyn_ref::<web_sys::MouseEvent>() {
                sink(SurfaceEvent::PointerMoved {
                    x: pointer.client_x() as f64,
                });
            }
        });
        let released = EventListener::new(
            &self.document,
            "pointerup",
            self.emit(SurfaceEvent::PointerReleased),
        );
        let cancelled = EventListener::new(
            &self.document,
            "pointercancel",
            self.emit(SurfaceEvent::PointerReleased),
        );
        self.listeners.add(ListenerGroup::Drag, moved);
        self.listeners.add(ListenerGroup::Drag, released);
        self.listeners.add(ListenerGroup::Drag, cancelled);

        self.set_modifier(&css::wrapper_modifier("resizing"), true);
        Ok(())
    }

    fn release_pointer(&mut self) {
        self.listeners.clear(ListenerGroup::Drag);
        self.set_modifier(&css::wrapper_modifier("resizing"), false);
    }

    fn caption_text(&self) -> String {
        self.caption
            .as_ref()
            .map(|c| c.inner_html())
            .unwrap_or_default()
    }

    fn set_modifier(&mut self, modifier: &str, enabled: bool) {
        if let Some(wrapper) = &self.wrapper {
            if let Err(e) = wrapper.class_list().toggle_with_force(modifier, enabled) {
                tracing::warn!("could not toggle {modifier}: {:?}", e);
            }
        }
    }

    fn teardown(&mut self) {
        tracing::debug!(listeners = self.listeners.len(), "detaching surface listeners");
        self.listeners.clear_all();
    }
}
