//! Persisted block data.
//!
//! The shape is versionless JSON:
//!
//! ```json
//! { "file": { "url": "...", ...extra }, "caption": "", "width": "40" }
//! ```
//!
//! `width` is either a percentage (new saves) or a legacy pixel count, and
//! `height` only ever appears in legacy data. Unknown keys on `file` and on
//! the block itself are carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Asset descriptor returned by the upload backend.
///
/// Only `url` is interpreted. Everything else the backend sends (ids,
/// extensions, colors...) is kept in `extra` and written back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetFile {
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AssetFile {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            extra: Map::new(),
        }
    }

    /// Whether this descriptor names an asset at all.
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// The block's canonical saved state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockData {
    #[serde(default)]
    pub file: AssetFile,

    #[serde(default)]
    pub caption: String,

    /// Percentage string (`"0"`..`"100"`) or legacy pixel count (`> 100`).
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_number"
    )]
    pub width: Option<String>,

    /// Legacy pixel height. Never written by new saves.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "string_or_number"
    )]
    pub height: Option<String>,

    /// Tune flags and any other keys a previous version stored on the block.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BlockData {
    /// Build data for a freshly uploaded asset with no caption or size.
    pub fn with_file(file: AssetFile) -> Self {
        Self {
            file,
            ..Default::default()
        }
    }

    /// Whether the block names an asset to display.
    pub fn has_asset(&self) -> bool {
        self.file.has_url()
    }

    /// Host-side validation: a block without an asset URL is not saveable.
    pub fn is_valid(&self) -> bool {
        self.has_asset()
    }

    /// Read a boolean tune flag stored on the block.
    pub fn tune(&self, name: &str) -> bool {
        self.extra.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn set_tune(&mut self, name: &str, enabled: bool) {
        self.extra.insert(name.to_string(), Value::Bool(enabled));
    }
}

/// Older saves sometimes stored dimensions as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_has_no_asset() {
        let data: BlockData = serde_json::from_value(json!({})).unwrap();
        assert!(!data.has_asset());
        assert_eq!(data.caption, "");
        assert_eq!(data.width, None);
    }

    #[test]
    fn test_validate_requires_url() {
        let empty: BlockData = serde_json::from_value(json!({ "file": {} })).unwrap();
        let blank: BlockData = serde_json::from_value(json!({ "file": { "url": "" } })).unwrap();
        let good: BlockData =
            serde_json::from_value(json!({ "file": { "url": "https://x/y.png" } })).unwrap();

        assert!(!empty.is_valid());
        assert!(!blank.is_valid());
        assert!(good.is_valid());
    }

    #[test]
    fn test_file_extra_fields_pass_through() {
        let input = json!({
            "file": { "url": "https://x/y.png", "id": 42, "color": "#fff", "extension": "png" },
            "caption": "hi",
            "width": "40",
            "stretched": true
        });
        let data: BlockData = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(data.file.extra.get("id"), Some(&json!(42)));
        assert!(data.tune("stretched"));

        let back = serde_json::to_value(&data).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn test_numeric_legacy_dimensions() {
        let data: BlockData = serde_json::from_value(json!({
            "file": { "url": "https://x/y.png" },
            "width": 640,
            "height": 480
        }))
        .unwrap();
        assert_eq!(data.width.as_deref(), Some("640"));
        assert_eq!(data.height.as_deref(), Some("480"));
    }

    #[test]
    fn test_saved_shape_omits_absent_dimensions() {
        let mut data = BlockData::with_file(AssetFile::new("https://x/y.png"));
        data.width = Some("40".into());
        insta::assert_json_snapshot!(data, @r#"
        {
          "file": {
            "url": "https://x/y.png"
          },
          "caption": "",
          "width": "40"
        }
        "#);
    }
}
