//! MediaBlockTool - the block tool class exposed to the host editor.

use js_sys::{Array, Object, Reflect, RegExp};
use mediablock_browser::BlockDriver;
use mediablock_core::host::text;
use mediablock_core::paste::{IMAGE_URL_PATTERN, PASTE_MIME_TYPES, PASTE_TAGS, extract_img_src};
use mediablock_core::{BlockData, HostApi, PasteEvent, ToolConfig};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, File, HtmlElement};

use crate::host::JsHost;
use crate::types::{PasteFiles, PasteKind, TOOLBOX_ICON, Toolbox, TuneState};
use crate::uploader::{JsUploader, ToolUploader};

type Driver = BlockDriver<ToolUploader, JsHost>;

fn field(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn is_nullish(value: &JsValue) -> bool {
    value.is_undefined() || value.is_null()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&e.to_string()))
}

/// One image or video block.
///
/// Constructed by the host with `{ data, config, api, readOnly }`.
#[wasm_bindgen(js_name = MediaBlockTool)]
pub struct JsMediaBlockTool {
    driver: Driver,
    host: JsHost,
}

#[wasm_bindgen(js_class = MediaBlockTool)]
impl JsMediaBlockTool {
    #[wasm_bindgen(constructor)]
    pub fn new(args: JsValue) -> Result<JsMediaBlockTool, JsError> {
        let raw_config = field(&args, "config");
        let config: ToolConfig = if is_nullish(&raw_config) {
            ToolConfig::default()
        } else {
            serde_wasm_bindgen::from_value(raw_config.clone())
                .map_err(|e| JsError::new(&format!("invalid tool config: {e}")))?
        };

        let raw_data = field(&args, "data");
        let data: BlockData = if is_nullish(&raw_data) {
            BlockData::default()
        } else {
            serde_wasm_bindgen::from_value(raw_data).unwrap_or_else(|e| {
                tracing::warn!("ignoring unreadable block data: {e}");
                BlockData::default()
            })
        };

        let read_only = field(&args, "readOnly").as_bool().unwrap_or(false);
        let host = JsHost::new(field(&args, "api"));

        let custom = JsUploader::from_config(&raw_config);
        if let Err(e) = config.validate(custom.handles_files(), custom.handles_urls()) {
            tracing::warn!("tool config: {e}");
        }
        let uploader = ToolUploader::new(custom, &config);

        let driver = BlockDriver::new(data, config, read_only, uploader, host.clone())
            .map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self { driver, host })
    }

    /// Build the block and return its root node.
    pub fn render(&self) -> Result<HtmlElement, JsError> {
        self.driver.render().map_err(|e| JsError::new(&e.to_string()))
    }

    pub fn save(&self) -> Result<JsValue, JsError> {
        to_js(&self.driver.save())
    }

    /// Whether saved data is worth keeping. Data without an asset URL is not.
    pub fn validate(&self, data: JsValue) -> bool {
        serde_wasm_bindgen::from_value::<BlockData>(data)
            .map(|data| Driver::validate(&data))
            .unwrap_or(false)
    }

    /// Handle content the host classified as ours: an `<img>` tag, a bare
    /// image URL, or a file.
    #[wasm_bindgen(js_name = onPaste)]
    pub fn on_paste(&self, event: JsValue) -> Result<(), JsError> {
        let kind: PasteKind = serde_wasm_bindgen::from_value(field(&event, "type"))
            .map_err(|e| JsError::new(&format!("unknown paste type: {e}")))?;
        let detail = field(&event, "detail");

        match kind {
            PasteKind::Tag => {
                let element = field(&detail, "data")
                    .dyn_into::<Element>()
                    .map_err(|_| JsError::new("tag paste without an element"))?;
                let src = element
                    .get_attribute("src")
                    .filter(|s| !s.is_empty())
                    .or_else(|| extract_img_src(&element.outer_html()))
                    .ok_or_else(|| JsError::new("pasted image has no src"))?;
                self.driver.paste(PasteEvent::Tag { src });
            }
            PasteKind::Pattern => {
                let text = field(&detail, "data")
                    .as_string()
                    .ok_or_else(|| JsError::new("pattern paste without text"))?;
                self.driver.paste(PasteEvent::Pattern { text });
            }
            PasteKind::File => {
                let file = field(&detail, "file")
                    .dyn_into::<File>()
                    .map_err(|_| JsError::new("file paste without a file"))?;
                self.driver.upload_file(file);
            }
        }
        Ok(())
    }

    /// Upload a file programmatically, as if it had been picked.
    #[wasm_bindgen(js_name = uploadFile)]
    pub fn upload_file(&self, file: File) {
        self.driver.upload_file(file);
    }

    /// Ask the backend to fetch a remote asset.
    #[wasm_bindgen(js_name = uploadUrl)]
    pub fn upload_url(&self, url: String) {
        self.driver.upload_url(url);
    }

    /// Configured tunes and whether each is active on this block.
    pub fn tunes(&self) -> Result<JsValue, JsError> {
        to_js(&self.tune_states())
    }

    /// Toggle a configured tune. Returns the new state, or `undefined` for
    /// an unknown tune.
    #[wasm_bindgen(js_name = toggleTune)]
    pub fn toggle_tune(&self, name: &str) -> Option<bool> {
        self.driver.toggle_action(name)
    }

    /// Settings menu entries in the host's tune format.
    #[wasm_bindgen(js_name = renderSettings)]
    pub fn render_settings(&self) -> Result<Array, JsError> {
        let entries = Array::new();
        for tune in self.tune_states() {
            let entry = to_js(&tune)?;
            let block = std::rc::Rc::downgrade(self.driver.block());
            let name = tune.name.clone();
            let on_activate = Closure::<dyn FnMut()>::new(move || {
                let Some(block) = block.upgrade() else { return };
                if let Ok(mut block) = block.try_borrow_mut() {
                    block.toggle_action(&name);
                }
            });
            Reflect::set(&entry, &"onActivate".into(), &on_activate.into_js_value())
                .map_err(|_| JsError::new("could not build settings entry"))?;
            entries.push(&entry);
        }
        Ok(entries)
    }

    /// Detach every listener. Pending uploads are discarded when they land.
    pub fn destroy(&self) {
        self.driver.destroy();
    }

    #[wasm_bindgen(getter)]
    pub fn toolbox() -> Result<JsValue, JsError> {
        to_js(&Toolbox {
            title: text::TOOLBOX_TITLE.to_string(),
            icon: TOOLBOX_ICON.to_string(),
        })
    }

    #[wasm_bindgen(getter, js_name = pasteConfig)]
    pub fn paste_config() -> Result<JsValue, JsError> {
        let config = Object::new();
        let set = |target: &JsValue, key: &str, value: &JsValue| {
            Reflect::set(target, &JsValue::from_str(key), value)
                .map(|_| ())
                .map_err(|_| JsError::new("could not build paste config"))
        };

        let tags: Array = PASTE_TAGS.iter().map(|t| JsValue::from_str(t)).collect();
        set(&config, "tags", &tags)?;

        let patterns = Object::new();
        let source = IMAGE_URL_PATTERN.trim_start_matches("(?i)");
        set(&patterns, "image", &RegExp::new(source, "i"))?;
        set(&config, "patterns", &patterns)?;

        let files = to_js(&PasteFiles {
            mime_types: PASTE_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
        })?;
        set(&config, "files", &files)?;

        Ok(config.into())
    }

    #[wasm_bindgen(getter, js_name = isReadOnlySupported)]
    pub fn is_read_only_supported() -> bool {
        true
    }
}

impl JsMediaBlockTool {
    fn tune_states(&self) -> Vec<TuneState> {
        let block = self.driver.block().borrow();
        block
            .config()
            .actions
            .iter()
            .map(|action| TuneState {
                name: action.name.to_string(),
                icon: action.icon.clone(),
                label: self.host.translate(&action.title),
                toggle: action.toggle,
                is_active: block.data().tune(&action.name),
            })
            .collect()
    }
}
