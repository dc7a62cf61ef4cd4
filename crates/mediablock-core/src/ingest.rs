//! Async upload drivers.
//!
//! Each driver starts the upload under a short borrow of the block, awaits
//! the transport with no borrow held, then re-acquires the block to apply
//! the result. A block dropped in the meantime simply never hears back.

use std::cell::RefCell;
use std::rc::Weak;

use crate::block::{MediaBlock, UploadOutcome, UploadTicket};
use crate::data::AssetFile;
use crate::host::HostApi;
use crate::paste::{PasteEvent, PasteRoute, route_paste};
use crate::surface::MediaSurface;
use crate::transport::{BlobReader, Transport, UploadError, UploadFile, Uploader};

fn finish<S: MediaSurface>(
    block: &Weak<RefCell<MediaBlock<S>>>,
    ticket: UploadTicket,
    result: Result<AssetFile, UploadError>,
    host: &impl HostApi,
) -> UploadOutcome {
    let Some(block) = block.upgrade() else {
        tracing::debug!(?ticket, "block dropped before upload finished");
        return UploadOutcome::Ignored;
    };
    let Ok(mut block) = block.try_borrow_mut() else {
        tracing::warn!(?ticket, "block busy, dropping upload result");
        return UploadOutcome::Ignored;
    };
    block.finish_upload(ticket, result, host)
}

fn begin<S: MediaSurface>(
    block: &Weak<RefCell<MediaBlock<S>>>,
    start: impl FnOnce(&mut MediaBlock<S>) -> UploadTicket,
) -> Option<UploadTicket> {
    let block = block.upgrade()?;
    let mut block = block.try_borrow_mut().ok()?;
    if block.is_destroyed() {
        return None;
    }
    Some(start(&mut block))
}

/// Upload a picked, dropped or pasted file.
pub async fn upload_file<S, U, H>(
    block: Weak<RefCell<MediaBlock<S>>>,
    transport: &Transport<U>,
    host: &H,
    file: UploadFile,
) -> UploadOutcome
where
    S: MediaSurface,
    U: Uploader,
    H: HostApi,
{
    let Some(ticket) = begin(&block, |b| b.begin_file_upload(&file)) else {
        return UploadOutcome::Ignored;
    };
    let result = transport.upload_by_file(&file).await;
    finish(&block, ticket, result, host)
}

/// Ask the backend to fetch a remote URL.
pub async fn upload_url<S, U, H>(
    block: Weak<RefCell<MediaBlock<S>>>,
    transport: &Transport<U>,
    host: &H,
    url: String,
) -> UploadOutcome
where
    S: MediaSurface,
    U: Uploader,
    H: HostApi,
{
    let Some(ticket) = begin(&block, |b| b.begin_url_upload(&url)) else {
        return UploadOutcome::Ignored;
    };
    let result = transport.upload_by_url(&url).await;
    finish(&block, ticket, result, host)
}

/// Handle pasted or dropped content.
///
/// In-memory sources are previewed directly, read into bytes and then sent
/// through the file path; a remote URL would be meaningless to the backend.
pub async fn ingest_paste<S, U, B, H>(
    block: Weak<RefCell<MediaBlock<S>>>,
    transport: &Transport<U>,
    reader: &B,
    host: &H,
    event: PasteEvent,
) -> UploadOutcome
where
    S: MediaSurface,
    U: Uploader,
    B: BlobReader,
    H: HostApi,
{
    match route_paste(event) {
        PasteRoute::UploadUrl(url) => upload_url(block, transport, host, url).await,
        PasteRoute::UploadFile(file) => upload_file(block, transport, host, file).await,
        PasteRoute::ReadThenUploadFile(src) => {
            let Some(ticket) = begin(&block, |b| b.begin_source_upload(&src)) else {
                return UploadOutcome::Ignored;
            };
            let result = match reader.read_blob(&src).await {
                Ok(file) => transport.upload_by_file(&file).await,
                Err(e) => Err(e),
            };
            finish(&block, ticket, result, host)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ToolConfig;
    use crate::data::BlockData;
    use crate::host::NotifyStyle;
    use crate::state::RenderState;
    use crate::surface::SurfaceEvent;
    use crate::testing::{MockSurface, RecordingHost};
    use serde_json::{Value, json};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct FakeUploader {
        calls: RefCell<Vec<String>>,
        reject: bool,
    }

    impl FakeUploader {
        fn respond(&self, url: String) -> Result<Value, UploadError> {
            if self.reject {
                Ok(json!({ "success": 0 }))
            } else {
                Ok(json!({ "success": 1, "file": { "url": url } }))
            }
        }
    }

    impl Uploader for FakeUploader {
        async fn upload_by_file(&self, file: &UploadFile) -> Result<Value, UploadError> {
            self.calls.borrow_mut().push(format!("file:{}", file.name));
            self.respond(format!("https://cdn/{}", file.name))
        }

        async fn upload_by_url(&self, url: &str) -> Result<Value, UploadError> {
            self.calls.borrow_mut().push(format!("url:{url}"));
            self.respond(url.to_string())
        }
    }

    struct FakeReader {
        fail: bool,
    }

    impl BlobReader for FakeReader {
        async fn read_blob(&self, _url: &str) -> Result<UploadFile, UploadError> {
            if self.fail {
                Err(UploadError::Read("revoked".into()))
            } else {
                Ok(UploadFile::new("pasted.png", "image/png", vec![1u8, 2]))
            }
        }
    }

    /// Reader that records whether the upload trigger was showing while the
    /// source was read.
    struct WatchingReader {
        block: Rc<RefCell<MediaBlock<MockSurface>>>,
        trigger_seen: Cell<Option<bool>>,
    }

    impl BlobReader for WatchingReader {
        async fn read_blob(&self, _url: &str) -> Result<UploadFile, UploadError> {
            let visible = self.block.borrow().presentation().surface().trigger_visible;
            self.trigger_seen.set(Some(visible));
            Ok(UploadFile::new("pasted.png", "image/png", vec![1u8]))
        }
    }

    fn rendered_block(host: &RecordingHost) -> Rc<RefCell<MediaBlock<MockSurface>>> {
        let mut block = MediaBlock::new(
            BlockData::default(),
            ToolConfig::default(),
            false,
            MockSurface::new(800.0, (200.0, 100.0)),
        );
        block.render(host).unwrap();
        Rc::new(RefCell::new(block))
    }

    #[tokio::test]
    async fn test_file_upload_fills_block() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let transport = Transport::new(FakeUploader::default());

        let file = UploadFile::new("a.png", "image/png", vec![9u8]);
        let outcome = upload_file(Rc::downgrade(&block), &transport, &host, file).await;

        assert_eq!(outcome, UploadOutcome::Stored);
        assert_eq!(block.borrow().data().file.url, "https://cdn/a.png");
        block.borrow_mut().handle_event(SurfaceEvent::MediaReady, &host);
        assert_eq!(block.borrow().state(), RenderState::Filled);
    }

    #[tokio::test]
    async fn test_pattern_and_tag_paste_behave_identically() {
        let url = "https://x/y.png";
        let mut results = Vec::new();
        for event in [
            PasteEvent::Pattern { text: url.into() },
            PasteEvent::Tag { src: url.into() },
        ] {
            let host = RecordingHost::default();
            let block = rendered_block(&host);
            let transport = Transport::new(FakeUploader::default());
            let reader = FakeReader { fail: false };
            let outcome =
                ingest_paste(Rc::downgrade(&block), &transport, &reader, &host, event).await;
            let calls = transport.uploader().calls.borrow().clone();
            let data = block.borrow().data().clone();
            results.push((outcome, calls, data));
        }
        assert_eq!(results[0], results[1]);
        assert_eq!(results[0].1, vec![format!("url:{url}")]);
    }

    #[tokio::test]
    async fn test_blob_tag_paste_uses_file_upload() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let transport = Transport::new(FakeUploader::default());
        let reader = FakeReader { fail: false };

        let event = PasteEvent::Tag {
            src: "blob:https://editor.local/1".into(),
        };
        let outcome = ingest_paste(Rc::downgrade(&block), &transport, &reader, &host, event).await;

        assert_eq!(outcome, UploadOutcome::Stored);
        assert_eq!(*transport.uploader().calls.borrow(), vec!["file:pasted.png"]);
        assert_eq!(block.borrow().data().file.url, "https://cdn/pasted.png");
    }

    #[tokio::test]
    async fn test_data_source_paste_hides_trigger_while_reading() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let transport = Transport::new(FakeUploader::default());
        let reader = WatchingReader {
            block: block.clone(),
            trigger_seen: Cell::new(None),
        };

        let event = PasteEvent::Tag {
            src: "data:image/png;base64,AAAA".into(),
        };
        let outcome = ingest_paste(Rc::downgrade(&block), &transport, &reader, &host, event).await;

        assert_eq!(outcome, UploadOutcome::Stored);
        assert_eq!(reader.trigger_seen.get(), Some(false));
    }

    #[tokio::test]
    async fn test_unreadable_blob_reports_failure() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let transport = Transport::new(FakeUploader::default());
        let reader = FakeReader { fail: true };

        let event = PasteEvent::Tag { src: "blob:gone".into() };
        let outcome = ingest_paste(Rc::downgrade(&block), &transport, &reader, &host, event).await;

        assert_eq!(outcome, UploadOutcome::Failed);
        assert!(transport.uploader().calls.borrow().is_empty());
        assert_eq!(block.borrow().state(), RenderState::Empty);
        assert_eq!(host.notices.borrow()[0].1, NotifyStyle::Error);
    }

    #[tokio::test]
    async fn test_rejected_upload_notifies() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let transport = Transport::new(FakeUploader {
            reject: true,
            ..Default::default()
        });

        let outcome =
            upload_url(Rc::downgrade(&block), &transport, &host, "https://x/y.png".into()).await;

        assert_eq!(outcome, UploadOutcome::Failed);
        assert_eq!(host.notices.borrow().len(), 1);
        assert!(block.borrow().presentation().surface().trigger_visible);
    }

    #[tokio::test]
    async fn test_dropped_block_is_left_alone() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        let weak = Rc::downgrade(&block);
        drop(block);

        let transport = Transport::new(FakeUploader::default());
        let outcome = upload_url(weak, &transport, &host, "https://x/y.png".into()).await;
        assert_eq!(outcome, UploadOutcome::Ignored);
        assert!(transport.uploader().calls.borrow().is_empty());
        assert!(host.notices.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_destroyed_block_starts_nothing() {
        let host = RecordingHost::default();
        let block = rendered_block(&host);
        block.borrow_mut().destroy();

        let transport = Transport::new(FakeUploader::default());
        let file = UploadFile::new("a.png", "image/png", vec![9u8]);
        let outcome = upload_file(Rc::downgrade(&block), &transport, &host, file).await;
        assert_eq!(outcome, UploadOutcome::Ignored);
        assert!(transport.uploader().calls.borrow().is_empty());
    }
}
