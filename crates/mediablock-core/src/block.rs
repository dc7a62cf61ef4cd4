//! The coordinator: owns `BlockData` and translates host lifecycle calls.
//!
//! `MediaBlock` is the only thing that mutates the saved data. Uploads are
//! split into a synchronous `begin_*` half (preloader, trigger visibility)
//! and a `finish_upload` half that applies the transport result, so the
//! platform layer can await the request without holding a borrow.

use crate::config::ToolConfig;
use crate::data::{AssetFile, BlockData};
use crate::dimension::{SavedWidth, width_percent};
use crate::host::{HostApi, NotifyStyle, text};
use crate::presentation::Presentation;
use crate::state::RenderState;
use crate::surface::{
    ButtonLayout, CaptionLayout, MediaSurface, PlatformError, SurfaceEvent, SurfaceLayout, css,
};
use crate::transport::{UploadError, UploadFile};

/// Whether captions are shown for a block. Decided once at construction.
///
/// Captions are on unless the feature is switched off, or the block is
/// read-only and has no caption to show.
pub fn caption_enabled(config: &ToolConfig, read_only: bool, initial_caption: &str) -> bool {
    config.features.caption && !(read_only && initial_caption.is_empty())
}

/// Something the platform layer must do in response to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockEffect {
    None,
    /// Open the native file picker.
    OpenFilePicker,
}

/// Identifies one upload. Only the most recently started upload may apply
/// its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// What happened to an upload result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The asset was stored and is being displayed.
    Stored,
    /// The upload failed; the user was notified and the block reset.
    Failed,
    /// The block was destroyed or a newer upload started; result dropped.
    Ignored,
}

pub struct MediaBlock<S> {
    data: BlockData,
    config: ToolConfig,
    presentation: Presentation<S>,
    read_only: bool,
    generation: u64,
    in_flight: Option<UploadTicket>,
    /// The displayed asset came from an upload in this session.
    uploaded_asset: bool,
    rendered: bool,
    destroyed: bool,
}

impl<S: MediaSurface> MediaBlock<S> {
    pub fn new(data: BlockData, config: ToolConfig, read_only: bool, surface: S) -> Self {
        let captions = caption_enabled(&config, read_only, &data.caption);
        Self {
            presentation: Presentation::new(surface, read_only, captions),
            data,
            config,
            read_only,
            generation: 0,
            in_flight: None,
            uploaded_asset: false,
            rendered: false,
            destroyed: false,
        }
    }

    pub fn data(&self) -> &BlockData {
        &self.data
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    pub fn presentation(&self) -> &Presentation<S> {
        &self.presentation
    }

    pub fn presentation_mut(&mut self) -> &mut Presentation<S> {
        &mut self.presentation
    }

    pub fn state(&self) -> RenderState {
        self.presentation.state()
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn is_uploading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Host-side validation: data without an asset URL cannot be saved.
    pub fn validate(data: &BlockData) -> bool {
        data.is_valid()
    }

    /// Build the node tree and show the saved asset, if any.
    ///
    /// Leaves the block `Empty` when there is no asset and `Uploading` while
    /// a saved asset loads. Calling it again is a no-op.
    pub fn render(&mut self, host: &impl HostApi) -> Result<(), PlatformError> {
        if self.rendered {
            return Ok(());
        }

        let layout = self.layout(host);
        self.presentation.build(&layout)?;
        self.rendered = true;

        for action in &self.config.actions {
            if self.data.tune(&action.name) {
                self.presentation
                    .set_modifier(&css::wrapper_modifier(&action.name), true);
            }
        }

        if self.data.has_asset() {
            self.show_current_asset()?;
        }
        Ok(())
    }

    fn layout(&self, host: &impl HostApi) -> SurfaceLayout {
        let caption = self
            .presentation
            .caption_enabled()
            .then(|| CaptionLayout {
                text: self.data.caption.clone(),
                placeholder: host.translate(&self.config.caption_placeholder),
            });
        let button = match &self.config.button_content {
            Some(html) => ButtonLayout::Html(html.clone()),
            None => ButtonLayout::Label(host.translate(text::SELECT_IMAGE)),
        };
        SurfaceLayout {
            read_only: self.read_only,
            caption,
            button,
        }
    }

    fn show_current_asset(&mut self) -> Result<(), PlatformError> {
        let saved = SavedWidth::from_saved(self.data.width.as_deref());
        if self.data.height.is_some() {
            tracing::debug!(width = ?self.data.width, "legacy pixel dimensions present");
        }
        self.presentation.display(&self.data.file.url, saved)
    }

    /// Produce the data to persist.
    ///
    /// The width is only rewritten from a live measurement with both sides
    /// strictly positive, so an element that is not laid out can never
    /// overwrite a valid saved size or produce a `0`/`0` pair.
    pub fn save(&mut self) -> BlockData {
        if let Some(caption) = self.presentation.caption() {
            self.data.caption = caption;
        }

        match self.presentation.rendered_size() {
            Some(size) if size.is_laid_out() => {
                let container = self.presentation.container_width();
                match width_percent(size.width, container) {
                    Some(percent) => {
                        self.data.width = Some(percent.to_string());
                        self.data.height = None;
                    }
                    None => tracing::debug!(
                        width = size.width,
                        container,
                        "container not measurable, keeping saved width"
                    ),
                }
            }
            size => tracing::debug!(?size, "media not laid out, keeping saved width"),
        }

        self.data.clone()
    }

    /// Route a platform event, returning anything the platform must do.
    ///
    /// A load failure of an asset that was just uploaded is reported like a
    /// failed upload. A saved asset that fails to load only resets the block.
    pub fn handle_event(&mut self, event: SurfaceEvent, host: &impl HostApi) -> BlockEffect {
        if self.destroyed {
            return BlockEffect::None;
        }
        match event {
            SurfaceEvent::UploadRequested => {
                if self.read_only || self.is_uploading() {
                    BlockEffect::None
                } else {
                    BlockEffect::OpenFilePicker
                }
            }
            SurfaceEvent::MediaError => {
                tracing::warn!(url = %self.data.file.url, "asset failed to load");
                if std::mem::take(&mut self.uploaded_asset) {
                    self.upload_failed(host);
                } else {
                    self.presentation.handle_event(event);
                }
                BlockEffect::None
            }
            SurfaceEvent::MediaReady => {
                self.uploaded_asset = false;
                self.presentation.handle_event(event);
                BlockEffect::None
            }
            other => {
                self.presentation.handle_event(other);
                BlockEffect::None
            }
        }
    }

    fn next_ticket(&mut self) -> UploadTicket {
        self.generation += 1;
        let ticket = UploadTicket(self.generation);
        self.in_flight = Some(ticket);
        self.uploaded_asset = false;
        ticket
    }

    /// Start a file upload: preview the file locally and hide the trigger.
    pub fn begin_file_upload(&mut self, file: &UploadFile) -> UploadTicket {
        let ticket = self.next_ticket();
        self.presentation.begin_upload(Some(&file.preview_data_url()));
        self.presentation.set_upload_trigger_visible(false);
        tracing::debug!(?ticket, name = %file.name, "file upload started");
        ticket
    }

    /// Start a URL upload: use the URL itself as the preview.
    pub fn begin_url_upload(&mut self, url: &str) -> UploadTicket {
        let ticket = self.next_ticket();
        self.presentation.begin_upload(Some(url));
        tracing::debug!(?ticket, %url, "url upload started");
        ticket
    }

    /// Start uploading an in-memory source (`blob:`/`data:`) as a file. The
    /// source previews itself while its bytes are read.
    pub fn begin_source_upload(&mut self, src: &str) -> UploadTicket {
        let ticket = self.next_ticket();
        self.presentation.begin_upload(Some(src));
        self.presentation.set_upload_trigger_visible(false);
        tracing::debug!(?ticket, "in-memory source upload started");
        ticket
    }

    /// Apply a transport result.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        result: Result<AssetFile, UploadError>,
        host: &impl HostApi,
    ) -> UploadOutcome {
        if self.destroyed || self.in_flight != Some(ticket) {
            tracing::debug!(?ticket, "dropping stale upload result");
            return UploadOutcome::Ignored;
        }
        self.in_flight = None;

        match result {
            Ok(file) => {
                self.data.file = file;
                match self.show_current_asset() {
                    Ok(()) => {
                        self.uploaded_asset = true;
                        UploadOutcome::Stored
                    }
                    Err(e) => {
                        tracing::error!("could not display uploaded asset: {e}");
                        self.upload_failed(host);
                        UploadOutcome::Failed
                    }
                }
            }
            Err(e) => {
                tracing::error!("upload failed: {e}");
                self.upload_failed(host);
                UploadOutcome::Failed
            }
        }
    }

    fn upload_failed(&mut self, host: &impl HostApi) {
        host.notify(&host.translate(text::UPLOAD_FAILED), NotifyStyle::Error);
        self.presentation.upload_failed();
    }

    /// Toggle a configured tune. Returns the new value, or `None` for an
    /// unknown action.
    pub fn toggle_action(&mut self, name: &str) -> Option<bool> {
        let action = self.config.action(name)?;
        let enabled = if action.toggle {
            !self.data.tune(name)
        } else {
            true
        };
        self.data.set_tune(name, enabled);
        self.presentation
            .set_modifier(&css::wrapper_modifier(name), enabled);
        Some(enabled)
    }

    /// Detach every listener. Pending uploads are dropped when they resolve.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.in_flight = None;
        self.presentation.teardown();
        tracing::debug!("block destroyed");
    }
}
