//! Caller-supplied upload functions with HTTP fallback.

use js_sys::{Array, Function, Promise, Uint8Array};
use mediablock_core::{HttpUploader, ToolConfig, UploadError, UploadFile, Uploader};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FilePropertyBag};

/// `config.uploader.uploadByFile` / `uploadByUrl`, when provided.
///
/// Each must return a Promise resolving to the upload envelope.
#[derive(Debug, Clone, Default)]
pub struct JsUploader {
    by_file: Option<Function>,
    by_url: Option<Function>,
}

impl JsUploader {
    /// Pull the override functions out of the raw config object.
    pub fn from_config(config: &JsValue) -> Self {
        let uploader = js_sys::Reflect::get(config, &"uploader".into()).unwrap_or(JsValue::UNDEFINED);
        if uploader.is_undefined() || uploader.is_null() {
            return Self::default();
        }
        let function = |key: &str| {
            js_sys::Reflect::get(&uploader, &key.into())
                .ok()
                .and_then(|f| f.dyn_into::<Function>().ok())
        };
        Self {
            by_file: function("uploadByFile"),
            by_url: function("uploadByUrl"),
        }
    }

    pub fn handles_files(&self) -> bool {
        self.by_file.is_some()
    }

    pub fn handles_urls(&self) -> bool {
        self.by_url.is_some()
    }
}

fn custom_err(e: JsValue) -> UploadError {
    UploadError::Custom(format!("{e:?}"))
}

async fn call_custom(function: &Function, arg: &JsValue) -> Result<Value, UploadError> {
    let returned = function.call1(&JsValue::NULL, arg).map_err(custom_err)?;
    let promise = returned
        .dyn_into::<Promise>()
        .map_err(|_| UploadError::Custom("custom uploader must return a Promise".into()))?;
    let body = JsFuture::from(promise).await.map_err(custom_err)?;
    serde_wasm_bindgen::from_value(body).map_err(|e| UploadError::Malformed(e.to_string()))
}

fn to_js_file(file: &UploadFile) -> Result<File, UploadError> {
    let parts = Array::of1(&Uint8Array::from(file.data.as_ref()));
    let options = FilePropertyBag::new();
    options.set_type(&file.content_type());
    File::new_with_u8_array_sequence_and_options(&parts, &file.name, &options).map_err(custom_err)
}

/// The uploader a tool instance actually uses: custom functions where
/// supplied, HTTP to the configured endpoints otherwise.
#[derive(Debug, Clone)]
pub struct ToolUploader {
    custom: JsUploader,
    http: HttpUploader,
}

impl ToolUploader {
    pub fn new(custom: JsUploader, config: &ToolConfig) -> Self {
        Self {
            custom,
            http: HttpUploader::from_config(config),
        }
    }
}

impl Uploader for ToolUploader {
    async fn upload_by_file(&self, file: &UploadFile) -> Result<Value, UploadError> {
        match &self.custom.by_file {
            Some(function) => call_custom(function, &to_js_file(file)?.into()).await,
            None => self.http.upload_by_file(file).await,
        }
    }

    async fn upload_by_url(&self, url: &str) -> Result<Value, UploadError> {
        match &self.custom.by_url {
            Some(function) => call_custom(function, &JsValue::from_str(url)).await,
            None => self.http.upload_by_url(url).await,
        }
    }
}
