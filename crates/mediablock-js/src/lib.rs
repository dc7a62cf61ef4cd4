//! WASM bindings for the media block.
//!
//! Exposes `MediaBlockTool`, a block tool class for Editor.js-style hosts:
//!
//! ```js
//! import init, { MediaBlockTool } from "mediablock-js";
//! await init();
//! editor = new EditorJS({ tools: { image: { class: MediaBlockTool, config } } });
//! ```

mod host;
mod tool;
mod types;
mod uploader;

pub use host::JsHost;
pub use tool::*;
pub use types::*;
pub use uploader::{JsUploader, ToolUploader};

use wasm_bindgen::prelude::*;

/// Install the panic hook and route `tracing` output to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let _ = set_global_default(Registry::default().with(wasm_layer));
}
