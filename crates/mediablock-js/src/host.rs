//! `HostApi` over the editor's `api` object.

use js_sys::{Function, Object, Reflect};
use mediablock_core::{HostApi, NotifyStyle, SmolStr, StyleClasses};
use wasm_bindgen::{JsCast, JsValue};

/// Wraps the `api` object the host passes to the tool constructor.
///
/// Uses `api.i18n.t`, `api.notifier.show` and `api.styles`. Missing pieces
/// degrade to identity translation, a console warning and default classes.
#[derive(Debug, Clone)]
pub struct JsHost {
    api: JsValue,
}

fn get(target: &JsValue, key: &str) -> Option<JsValue> {
    if target.is_undefined() || target.is_null() {
        return None;
    }
    Reflect::get(target, &JsValue::from_str(key))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

fn method(target: &JsValue, key: &str) -> Option<Function> {
    get(target, key)?.dyn_into::<Function>().ok()
}

impl JsHost {
    pub fn new(api: JsValue) -> Self {
        Self { api }
    }

    fn style(&self, key: &str) -> Option<SmolStr> {
        let styles = get(&self.api, "styles")?;
        get(&styles, key)?.as_string().map(SmolStr::from)
    }
}

impl HostApi for JsHost {
    fn translate(&self, text: &str) -> String {
        let Some(i18n) = get(&self.api, "i18n") else {
            return text.to_string();
        };
        method(&i18n, "t")
            .and_then(|t| t.call1(&i18n, &JsValue::from_str(text)).ok())
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| text.to_string())
    }

    fn notify(&self, message: &str, style: NotifyStyle) {
        let shown = get(&self.api, "notifier").and_then(|notifier| {
            let show = method(&notifier, "show")?;
            let options = Object::new();
            Reflect::set(&options, &"message".into(), &message.into()).ok()?;
            Reflect::set(&options, &"style".into(), &style.as_str().into()).ok()?;
            show.call1(&notifier, &options).ok()
        });
        if shown.is_none() {
            tracing::warn!(style = style.as_str(), "{message}");
        }
    }

    fn styles(&self) -> StyleClasses {
        let defaults = StyleClasses::default();
        StyleClasses {
            block: self.style("block").unwrap_or(defaults.block),
            input: self.style("input").unwrap_or(defaults.input),
            button: self.style("button").unwrap_or(defaults.button),
            loader: self.style("loader").unwrap_or(defaults.loader),
        }
    }
}
