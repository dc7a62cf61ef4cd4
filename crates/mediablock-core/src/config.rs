//! Caller-supplied tool configuration.
//!
//! Every field is optional on the wire; missing fields fall back to the
//! defaults below. Custom upload functions are not part of this struct since
//! they are not serializable; the binding layer carries them alongside.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smol_str::SmolStr;

use crate::host::text;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("no `endpoints.{0}` configured and no custom uploader supplied")]
    MissingEndpoint(&'static str),
    #[error("action name must not be empty")]
    UnnamedAction,
}

/// Upload endpoints on the caller's backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Endpoints {
    /// Receives `multipart/form-data` file uploads.
    pub by_file: Option<String>,
    /// Receives `application/json` `{ url, additionalRequestData }` bodies.
    pub by_url: Option<String>,
}

/// Optional UI features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    pub caption: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self { caption: true }
    }
}

/// A custom tune shown in the block settings.
///
/// Toggling stores `name: bool` on the block data and sets the
/// `image-tool--<name>` modifier class on the wrapper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionDescriptor {
    pub name: SmolStr,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_true")]
    pub toggle: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ToolConfig {
    pub endpoints: Endpoints,
    /// Form field the file is attached under.
    pub field: String,
    /// `accept` filter for the file picker.
    pub types: String,
    /// Extra fields sent with every upload.
    pub additional_request_data: Map<String, Value>,
    /// Extra headers sent with every upload.
    pub additional_request_headers: Map<String, Value>,
    pub caption_placeholder: String,
    /// Custom markup for the upload trigger.
    pub button_content: Option<String>,
    pub actions: Vec<ActionDescriptor>,
    pub features: Features,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            field: "image".to_string(),
            types: "image/*, video/mp4".to_string(),
            additional_request_data: Map::new(),
            additional_request_headers: Map::new(),
            caption_placeholder: text::CAPTION.to_string(),
            button_content: None,
            actions: Vec::new(),
            features: Features::default(),
        }
    }
}

impl ToolConfig {
    /// Check the configuration is usable.
    ///
    /// Endpoints are only required for the operations not covered by a
    /// custom uploader.
    pub fn validate(&self, custom_by_file: bool, custom_by_url: bool) -> Result<(), ConfigError> {
        if !custom_by_file && self.endpoints.by_file.is_none() {
            return Err(ConfigError::MissingEndpoint("byFile"));
        }
        if !custom_by_url && self.endpoints.by_url.is_none() {
            return Err(ConfigError::MissingEndpoint("byUrl"));
        }
        if self.actions.iter().any(|a| a.name.is_empty()) {
            return Err(ConfigError::UnnamedAction);
        }
        Ok(())
    }

    pub fn action(&self, name: &str) -> Option<&ActionDescriptor> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// Headers as string pairs. Non-string values are rendered as JSON.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.additional_request_headers
            .iter()
            .map(|(k, v)| (k.clone(), value_to_field(v)))
            .collect()
    }

    /// Additional request data as multipart text fields.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        self.additional_request_data
            .iter()
            .map(|(k, v)| (k.clone(), value_to_field(v)))
            .collect()
    }
}

fn value_to_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn default_true() -> bool {
    true
}
