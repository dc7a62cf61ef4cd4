//! Native file picker.

use gloo_events::EventListener;
use mediablock_core::PlatformError;
use wasm_bindgen::JsCast;
use web_sys::{Document, File, HtmlInputElement};

use crate::dom::js_err;
use crate::listeners::{ListenerGroup, ListenerSet};

/// A detached `<input type="file">` and its change listener. Dropping the
/// picker detaches the listener.
pub struct FilePicker {
    input: HtmlInputElement,
    listeners: ListenerSet,
}

impl FilePicker {
    /// Open the picker. `on_file` receives the first selected file.
    pub fn open(
        document: &Document,
        accept: &str,
        on_file: impl Fn(File) + 'static,
    ) -> Result<Self, PlatformError> {
        let input = document
            .create_element("input")
            .map_err(js_err)?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| PlatformError::from("created element is not an input"))?;
        input.set_type("file");
        input.set_accept(accept);

        let target = input.clone();
        let listener = EventListener::new(&input, "change", move |_| {
            match target.files().and_then(|files| files.get(0)) {
                Some(file) => on_file(file),
                None => tracing::debug!("file picker closed without a selection"),
            }
        });

        let mut listeners = ListenerSet::new();
        listeners.add(ListenerGroup::Picker, listener);
        input.click();
        Ok(Self { input, listeners })
    }

    pub fn input(&self) -> &HtmlInputElement {
        &self.input
    }

    pub fn is_listening(&self) -> bool {
        self.listeners.count(ListenerGroup::Picker) > 0
    }
}
