//! Upload transport.
//!
//! An [`Uploader`] performs the actual request and hands back the raw JSON
//! body; [`Transport`] normalizes that body into an [`AssetFile`] or an
//! [`UploadError`]. Failures never escape as panics: every path ends in a
//! `Result` the coordinator turns into a notification.

use std::future::Future;

use base64::{Engine, engine::general_purpose::STANDARD};
use bytes::Bytes;
use mime_sniffer::MimeTypeSniffer;
use serde::Deserialize;
use serde_json::Value;

use crate::data::AssetFile;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// No endpoint configured for this kind of upload.
    #[error("no endpoint configured for {0} uploads")]
    MissingEndpoint(&'static str),

    /// Request could not be sent or the server answered with an error status.
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered but reported failure.
    #[error("upload rejected by server")]
    Rejected,

    /// Backend answered with something that is not an upload envelope.
    #[error("malformed upload response: {0}")]
    Malformed(String),

    /// A caller-supplied uploader failed or broke its contract.
    #[error("custom uploader failed: {0}")]
    Custom(String),

    /// Reading pasted or picked file contents failed.
    #[error("could not read file: {0}")]
    Read(String),
}

/// A file selected, dropped or pasted by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    /// May be empty when the platform did not report one.
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Reported MIME type, or one sniffed from the content.
    pub fn content_type(&self) -> String {
        if !self.mime_type.is_empty() {
            return self.mime_type.clone();
        }
        self.data
            .sniff_mime_type()
            .unwrap_or("application/octet-stream")
            .to_string()
    }

    /// `data:` URL for showing a local preview while the upload runs.
    pub fn preview_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type(),
            STANDARD.encode(&self.data)
        )
    }
}

/// Performs upload requests and returns the raw response body.
pub trait Uploader {
    fn upload_by_file(&self, file: &UploadFile) -> impl Future<Output = Result<Value, UploadError>>;

    fn upload_by_url(&self, url: &str) -> impl Future<Output = Result<Value, UploadError>>;
}

/// Reads an in-memory source (`blob:` / `data:` URL) into a file.
pub trait BlobReader {
    fn read_blob(&self, url: &str) -> impl Future<Output = Result<UploadFile, UploadError>>;
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    success: Value,
    #[serde(default)]
    file: Option<AssetFile>,
}

/// Normalize a response body `{ success: 0|1, file: { url, ... } }`.
///
/// `success` may be a number or a boolean. Anything other than a truthy
/// `success` with a `file` carrying a non-empty `url` is an error.
pub fn parse_envelope(body: Value) -> Result<AssetFile, UploadError> {
    let envelope: Envelope = serde_json::from_value(body)
        .map_err(|e| UploadError::Malformed(e.to_string()))?;

    let success = match &envelope.success {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() == Some(1.0),
        _ => false,
    };
    if !success {
        return Err(UploadError::Rejected);
    }

    match envelope.file {
        Some(file) if file.has_url() => Ok(file),
        Some(_) => Err(UploadError::Malformed("`file.url` is missing".into())),
        None => Err(UploadError::Malformed("`file` is missing".into())),
    }
}

/// Normalizing wrapper around an [`Uploader`].
pub struct Transport<U> {
    uploader: U,
}

impl<U: Uploader> Transport<U> {
    pub fn new(uploader: U) -> Self {
        Self { uploader }
    }

    pub fn uploader(&self) -> &U {
        &self.uploader
    }

    pub async fn upload_by_file(&self, file: &UploadFile) -> Result<AssetFile, UploadError> {
        tracing::debug!(name = %file.name, bytes = file.data.len(), "uploading file");
        let result = self
            .uploader
            .upload_by_file(file)
            .await
            .and_then(parse_envelope);
        if let Err(e) = &result {
            tracing::error!(name = %file.name, "file upload failed: {e}");
        }
        result
    }

    pub async fn upload_by_url(&self, url: &str) -> Result<AssetFile, UploadError> {
        tracing::debug!(%url, "uploading by url");
        let result = self
            .uploader
            .upload_by_url(url)
            .await
            .and_then(parse_envelope);
        if let Err(e) = &result {
            tracing::error!(%url, "url upload failed: {e}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_success() {
        let file = parse_envelope(json!({
            "success": 1,
            "file": { "url": "https://x/y.png", "id": "abc" }
        }))
        .unwrap();
        assert_eq!(file.url, "https://x/y.png");
        assert_eq!(file.extra.get("id"), Some(&json!("abc")));

        assert!(parse_envelope(json!({ "success": true, "file": { "url": "u" } })).is_ok());
    }

    #[test]
    fn test_envelope_rejected() {
        assert!(matches!(
            parse_envelope(json!({ "success": 0, "file": { "url": "u" } })),
            Err(UploadError::Rejected)
        ));
        assert!(matches!(
            parse_envelope(json!({ "file": { "url": "u" } })),
            Err(UploadError::Rejected)
        ));
        assert!(matches!(
            parse_envelope(json!({ "success": "1", "file": { "url": "u" } })),
            Err(UploadError::Rejected)
        ));
    }

    #[test]
    fn test_envelope_malformed() {
        assert!(matches!(
            parse_envelope(json!({ "success": 1 })),
            Err(UploadError::Malformed(_))
        ));
        assert!(matches!(
            parse_envelope(json!({ "success": 1, "file": {} })),
            Err(UploadError::Malformed(_))
        ));
        assert!(matches!(
            parse_envelope(json!("nope")),
            Err(UploadError::Malformed(_))
        ));
    }

    #[test]
    fn test_preview_data_url_sniffs_mime() {
        let png_magic = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec();
        let file = UploadFile::new("pasted", "", png_magic);
        assert_eq!(file.content_type(), "image/png");
        assert!(file.preview_data_url().starts_with("data:image/png;base64,iVBORw0KGgo"));

        let typed = UploadFile::new("clip.mp4", "video/mp4", vec![0u8; 4]);
        assert_eq!(typed.content_type(), "video/mp4");
    }
}
