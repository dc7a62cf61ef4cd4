//! HTTP uploader talking to the caller's backend.
//!
//! - file uploads: `multipart/form-data` POST to `endpoints.byFile`, file under
//!   the configured field name, plus `additionalRequestData` as text fields
//! - URL uploads: JSON POST of `{ "url", "additionalRequestData" }` to
//!   `endpoints.byUrl`
//!
//! `additionalRequestHeaders` go on both. Works natively and in the browser
//! (reqwest uses `fetch` on wasm).

use reqwest::multipart::{Form, Part};
use serde_json::{Map, Value, json};

use crate::config::ToolConfig;
use crate::transport::{UploadError, UploadFile, Uploader};

#[derive(Debug, Clone)]
pub struct HttpUploader {
    client: reqwest::Client,
    by_file: Option<String>,
    by_url: Option<String>,
    field: String,
    additional_data: Map<String, Value>,
    form_fields: Vec<(String, String)>,
    headers: Vec<(String, String)>,
}

impl HttpUploader {
    pub fn from_config(config: &ToolConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            by_file: config.endpoints.by_file.clone(),
            by_url: config.endpoints.by_url.clone(),
            field: config.field.clone(),
            additional_data: config.additional_request_data.clone(),
            form_fields: config.form_fields(),
            headers: config.headers(),
        }
    }

    fn with_headers(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    /// JSON body for URL uploads.
    pub fn url_body(&self, url: &str) -> Value {
        json!({
            "url": url,
            "additionalRequestData": self.additional_data,
        })
    }
}

impl Uploader for HttpUploader {
    async fn upload_by_file(&self, file: &UploadFile) -> Result<Value, UploadError> {
        let endpoint = self
            .by_file
            .as_deref()
            .ok_or(UploadError::MissingEndpoint("file"))?;

        let part = Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.content_type())?;

        let mut form = Form::new().part(self.field.clone(), part);
        for (name, value) in &self.form_fields {
            form = form.text(name.clone(), value.clone());
        }

        let request = self.with_headers(self.client.post(endpoint)).multipart(form);
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }

    async fn upload_by_url(&self, url: &str) -> Result<Value, UploadError> {
        let endpoint = self
            .by_url
            .as_deref()
            .ok_or(UploadError::MissingEndpoint("url"))?;

        let request = self
            .with_headers(self.client.post(endpoint))
            .json(&self.url_body(url));
        let response = request.send().await?.error_for_status()?;
        Ok(response.json::<Value>().await?)
    }
}
