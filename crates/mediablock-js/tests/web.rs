//! WASM browser tests for mediablock-js.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use js_sys::{Function, Object, Reflect, RegExp};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;

use mediablock_core::{HostApi, StyleClasses};
use mediablock_js::{JsHost, JsMediaBlockTool};

wasm_bindgen_test_configure!(run_in_browser);

fn get(target: &JsValue, key: &str) -> JsValue {
    Reflect::get(target, &JsValue::from_str(key)).unwrap()
}

#[wasm_bindgen_test]
fn test_host_without_api_degrades() {
    let host = JsHost::new(JsValue::UNDEFINED);
    assert_eq!(host.translate("Caption"), "Caption");
    assert_eq!(host.styles(), StyleClasses::default());
}

#[wasm_bindgen_test]
fn test_host_uses_i18n_and_styles() {
    let api = Object::new();
    let i18n = Object::new();
    let t = Function::new_with_args("s", "return '[' + s + ']'");
    Reflect::set(&i18n, &"t".into(), &t).unwrap();
    Reflect::set(&api, &"i18n".into(), &i18n).unwrap();
    let styles = Object::new();
    Reflect::set(&styles, &"button".into(), &"host-button".into()).unwrap();
    Reflect::set(&api, &"styles".into(), &styles).unwrap();

    let host = JsHost::new(api.into());
    assert_eq!(host.translate("Caption"), "[Caption]");
    assert_eq!(host.styles().button, "host-button");
    assert_eq!(host.styles().block, "cdx-block");
}

#[wasm_bindgen_test]
fn test_paste_config_pattern_is_case_insensitive() {
    let config = JsMediaBlockTool::paste_config().unwrap();
    let pattern: RegExp = get(&get(&config, "patterns"), "image").dyn_into().unwrap();
    assert!(pattern.test("https://example.com/photo.JPG"));
    assert!(!pattern.test("https://example.com/page.html"));

    let mime_types = get(&get(&config, "files"), "mimeTypes");
    assert_eq!(js_sys::Array::from(&mime_types).length(), 2);
}

#[wasm_bindgen_test]
fn test_tool_round_trips_saved_data() {
    let args = Object::new();
    let data = js_sys::JSON::parse(
        r#"{ "file": { "url": "https://example.com/a.png", "id": 7 }, "caption": "Hi", "width": "640", "stretched": true }"#,
    )
    .unwrap();
    Reflect::set(&args, &"data".into(), &data).unwrap();
    Reflect::set(&args, &"readOnly".into(), &JsValue::TRUE).unwrap();

    let tool = JsMediaBlockTool::new(args.into()).unwrap();
    tool.render().unwrap();
    let saved = tool.save().unwrap();

    assert_eq!(get(&get(&saved, "file"), "id").as_f64(), Some(7.0));
    assert_eq!(get(&saved, "caption").as_string().as_deref(), Some("Hi"));
    // Not laid out yet, so the legacy width survives.
    assert_eq!(get(&saved, "width").as_string().as_deref(), Some("640"));
    assert_eq!(get(&saved, "stretched").as_bool(), Some(true));
    assert!(tool.validate(saved));

    tool.destroy();
}
