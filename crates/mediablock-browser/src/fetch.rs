//! Reading browser files and in-memory URLs into bytes.

use js_sys::Uint8Array;
use mediablock_core::{BlobReader, UploadError, UploadFile};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, File, Response};

fn read_err(e: JsValue) -> UploadError {
    UploadError::Read(format!("{e:?}"))
}

async fn blob_bytes(blob: &Blob) -> Result<Vec<u8>, UploadError> {
    let buffer = JsFuture::from(blob.array_buffer()).await.map_err(read_err)?;
    Ok(Uint8Array::new(&buffer).to_vec())
}

/// Read a picked, dropped or pasted file.
pub async fn read_file(file: &File) -> Result<UploadFile, UploadError> {
    let data = blob_bytes(file).await?;
    tracing::debug!(name = %file.name(), bytes = data.len(), "read file");
    Ok(UploadFile::new(file.name(), file.type_(), data))
}

/// Resolves `blob:` and `data:` URLs through `fetch`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserBlobReader;

impl BlobReader for BrowserBlobReader {
    async fn read_blob(&self, url: &str) -> Result<UploadFile, UploadError> {
        let window = web_sys::window().ok_or_else(|| UploadError::Read("no window".into()))?;
        let response: Response = JsFuture::from(window.fetch_with_str(url))
            .await
            .map_err(read_err)?
            .dyn_into()
            .map_err(read_err)?;
        if !response.ok() {
            return Err(UploadError::Read(format!("status {}", response.status())));
        }
        let blob: Blob = JsFuture::from(response.blob().map_err(read_err)?)
            .await
            .map_err(read_err)?
            .dyn_into()
            .map_err(read_err)?;

        let mime_type = blob.type_();
        let data = blob_bytes(&blob).await?;
        tracing::debug!(bytes = data.len(), %mime_type, "read in-memory source");
        Ok(UploadFile::new(pasted_name(&mime_type), mime_type, data))
    }
}

/// File name for a pasted source with no name of its own.
fn pasted_name(mime_type: &str) -> String {
    let ext = mime_type
        .split_once('/')
        .map(|(_, sub)| sub.split(['+', ';']).next().unwrap_or(sub))
        .filter(|sub| !sub.is_empty())
        .unwrap_or("bin");
    format!("pasted.{ext}")
}
