//! Wires a `MediaBlock` to the DOM and spawns its uploads.
//!
//! Ownership:
//!
//! ```text
//! BlockDriver ──Rc──▶ RefCell<MediaBlock<DomSurface>> ──▶ DomSurface ──▶ listeners ──▶ sink
//!      │                          ▲                                                    │
//!      └──Rc──▶ Services ◀────────┼──────────────────────Rc───────────────────────────┤
//!                                 └──────────────────────Weak─────────────────────────┘
//! ```
//!
//! Listeners only hold a weak reference to the block, so dropping the driver
//! drops the block and with it every listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use mediablock_core::host::text;
use mediablock_core::ingest;
use mediablock_core::{
    BlockData, BlockEffect, HostApi, MediaBlock, NotifyStyle, PasteEvent, PlatformError,
    SurfaceEvent, ToolConfig, Transport, UploadFile, Uploader,
};
use web_sys::{Document, File, HtmlElement};

use crate::dom::{DomSurface, EventSink};
use crate::fetch::{BrowserBlobReader, read_file};
use crate::listeners::DispatchGuard;
use crate::picker::FilePicker;

pub type SharedBlock = Rc<RefCell<MediaBlock<DomSurface>>>;
type WeakBlock = Weak<RefCell<MediaBlock<DomSurface>>>;

struct Services<U, H> {
    document: Document,
    transport: Transport<U>,
    host: H,
    reader: BrowserBlobReader,
    accept: String,
    picker: RefCell<Option<FilePicker>>,
}

pub struct BlockDriver<U, H> {
    block: SharedBlock,
    services: Rc<Services<U, H>>,
}

impl<U, H> BlockDriver<U, H>
where
    U: Uploader + 'static,
    H: HostApi + 'static,
{
    pub fn new(
        data: BlockData,
        config: ToolConfig,
        read_only: bool,
        uploader: U,
        host: H,
    ) -> Result<Self, PlatformError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PlatformError::from("no document"))?;

        let styles = host.styles();
        let services = Rc::new(Services {
            document: document.clone(),
            transport: Transport::new(uploader),
            host,
            reader: BrowserBlobReader,
            accept: config.types.clone(),
            picker: RefCell::new(None),
        });

        let block = Rc::new_cyclic(|weak: &WeakBlock| {
            let sink: EventSink = {
                let weak = weak.clone();
                let services = services.clone();
                Rc::new(move |event| dispatch(&weak, &services, event))
            };
            RefCell::new(MediaBlock::new(
                data,
                config,
                read_only,
                DomSurface::new(document, sink, styles),
            ))
        });

        Ok(Self { block, services })
    }

    pub fn block(&self) -> &SharedBlock {
        &self.block
    }

    /// Build the block and return its root node.
    pub fn render(&self) -> Result<HtmlElement, PlatformError> {
        let mut block = self.block.borrow_mut();
        block.render(&self.services.host)?;
        block
            .presentation()
            .surface()
            .element()
            .cloned()
            .ok_or_else(|| PlatformError::from("surface has no root element"))
    }

    pub fn save(&self) -> BlockData {
        self.block.borrow_mut().save()
    }

    pub fn validate(data: &BlockData) -> bool {
        MediaBlock::<DomSurface>::validate(data)
    }

    pub fn toggle_action(&self, name: &str) -> Option<bool> {
        self.block.borrow_mut().toggle_action(name)
    }

    /// Upload a browser file in the background.
    pub fn upload_file(&self, file: File) {
        spawn_file_upload(Rc::downgrade(&self.block), self.services.clone(), file);
    }

    /// Upload an already-read file in the background.
    pub fn upload_bytes(&self, file: UploadFile) {
        let weak = Rc::downgrade(&self.block);
        let services = self.services.clone();
        wasm_bindgen_futures::spawn_local(async move {
            ingest::upload_file(weak, &services.transport, &services.host, file).await;
        });
    }

    pub fn upload_url(&self, url: String) {
        let weak = Rc::downgrade(&self.block);
        let services = self.services.clone();
        wasm_bindgen_futures::spawn_local(async move {
            ingest::upload_url(weak, &services.transport, &services.host, url).await;
        });
    }

    pub fn paste(&self, event: PasteEvent) {
        let weak = Rc::downgrade(&self.block);
        let services = self.services.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let s = &*services;
            ingest::ingest_paste(weak, &s.transport, &s.reader, &s.host, event).await;
        });
    }

    /// Detach every listener. In-flight uploads resolve into nothing.
    pub fn destroy(&self) {
        self.services.picker.borrow_mut().take();
        match self.block.try_borrow_mut() {
            Ok(mut block) => block.destroy(),
            Err(_) => tracing::warn!("destroy called while the block is busy"),
        }
    }
}

fn spawn_file_upload<U, H>(weak: WeakBlock, services: Rc<Services<U, H>>, file: File)
where
    U: Uploader + 'static,
    H: HostApi + 'static,
{
    wasm_bindgen_futures::spawn_local(async move {
        match read_file(&file).await {
            Ok(file) => {
                ingest::upload_file(weak, &services.transport, &services.host, file).await;
            }
            Err(e) => {
                tracing::error!("could not read selected file: {e}");
                let host = &services.host;
                host.notify(&host.translate(text::UPLOAD_FAILED), NotifyStyle::Error);
            }
        }
    });
}

fn dispatch<U, H>(weak: &WeakBlock, services: &Rc<Services<U, H>>, event: SurfaceEvent)
where
    U: Uploader + 'static,
    H: HostApi + 'static,
{
    let _guard = DispatchGuard::enter();
    let Some(block) = weak.upgrade() else {
        return;
    };
    let effect = match block.try_borrow_mut() {
        Ok(mut block) => block.handle_event(event, &services.host),
        Err(_) => {
            tracing::warn!(?event, "event raised while the block is busy, dropping it");
            return;
        }
    };

    if effect == BlockEffect::OpenFilePicker {
        open_picker(weak.clone(), services);
    }
}

fn open_picker<U, H>(weak: WeakBlock, services: &Rc<Services<U, H>>)
where
    U: Uploader + 'static,
    H: HostApi + 'static,
{
    let picker_services = Rc::downgrade(services);
    let on_file = move |file: File| {
        if let Some(services) = picker_services.upgrade() {
            spawn_file_upload(weak.clone(), services, file);
        }
    };
    match FilePicker::open(&services.document, &services.accept, on_file) {
        Ok(picker) => {
            services.picker.replace(Some(picker));
        }
        Err(e) => tracing::warn!("could not open file picker: {e}"),
    }
}
