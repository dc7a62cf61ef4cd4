//! Capabilities the block borrows from its host editor.

use smol_str::SmolStr;

/// Notification styles understood by the host notifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyStyle {
    Error,
    Success,
    Info,
}

impl NotifyStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            NotifyStyle::Error => "error",
            NotifyStyle::Success => "success",
            NotifyStyle::Info => "info",
        }
    }
}

/// Class names the host uses for its shared block chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleClasses {
    pub block: SmolStr,
    pub input: SmolStr,
    pub button: SmolStr,
    pub loader: SmolStr,
}

impl Default for StyleClasses {
    fn default() -> Self {
        Self {
            block: SmolStr::new_static("cdx-block"),
            input: SmolStr::new_static("cdx-input"),
            button: SmolStr::new_static("cdx-button"),
            loader: SmolStr::new_static("cdx-loader"),
        }
    }
}

/// Host editor capabilities consumed by the block.
///
/// The block never depends on a concrete host type beyond this set.
pub trait HostApi {
    /// Translate a UI string. Hosts without i18n return it unchanged.
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }

    /// Show a user-facing notification.
    fn notify(&self, message: &str, style: NotifyStyle);

    fn styles(&self) -> StyleClasses {
        StyleClasses::default()
    }
}

impl<T: HostApi + ?Sized> HostApi for std::rc::Rc<T> {
    fn translate(&self, text: &str) -> String {
        (**self).translate(text)
    }

    fn notify(&self, message: &str, style: NotifyStyle) {
        (**self).notify(message, style)
    }

    fn styles(&self) -> StyleClasses {
        (**self).styles()
    }
}

/// UI strings, passed through [`HostApi::translate`] before display.
pub mod text {
    pub const SELECT_IMAGE: &str = "Select an Image";
    pub const CAPTION: &str = "Caption";
    pub const UPLOAD_FAILED: &str = "Couldn’t upload image. Please try another.";
    pub const TOOLBOX_TITLE: &str = "Image";
}
