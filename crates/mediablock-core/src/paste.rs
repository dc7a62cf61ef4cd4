//! Paste and drop ingestion routing.
//!
//! The host classifies pasted content into three kinds before handing it to
//! the block. Each kind ends up on exactly one upload path:
//!
//! | paste kind              | route                     |
//! |-------------------------|---------------------------|
//! | `<img>` with remote src | URL upload                |
//! | `<img>` with blob src   | read as binary, file upload |
//! | bare image URL          | URL upload                |
//! | file                    | file upload               |

use std::sync::LazyLock;

#[cfg(not(all(target_family = "wasm", target_os = "unknown")))]
use regex::Regex;
#[cfg(all(target_family = "wasm", target_os = "unknown"))]
use regex_lite::Regex;

use crate::transport::UploadFile;

/// Tags the block accepts from pasted HTML.
pub const PASTE_TAGS: &[&str] = &["IMG"];

/// File MIME types the block accepts from paste/drop.
pub const PASTE_MIME_TYPES: &[&str] = &["image/*", "video/mp4"];

/// Bare image URL pattern, as advertised to the host.
pub const IMAGE_URL_PATTERN: &str = r"(?i)^https?://\S+\.(gif|jpe?g|tiff|png|svg|webp)(\?\S*)?$";

static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(IMAGE_URL_PATTERN).expect("image URL pattern is valid"));

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<img\b[^>]*?\bsrc\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#)
        .expect("img src pattern is valid")
});

/// Pasted content as classified by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum PasteEvent {
    /// A pasted `<img>` element; `src` is its source attribute.
    Tag { src: String },
    /// A pasted string matching [`IMAGE_URL_PATTERN`].
    Pattern { text: String },
    /// A pasted or dropped file.
    File(UploadFile),
}

/// Which upload path a paste takes.
#[derive(Debug, Clone, PartialEq)]
pub enum PasteRoute {
    UploadUrl(String),
    /// In-memory source: read it as binary, then upload as a file.
    ReadThenUploadFile(String),
    UploadFile(UploadFile),
}

/// Whether a source only exists in the pasting page's memory (clipboard
/// images, PDF copies) and must be uploaded as bytes.
pub fn is_in_memory_source(src: &str) -> bool {
    let src = src.trim_start();
    src.starts_with("blob:") || src.starts_with("data:")
}

pub fn matches_image_url(text: &str) -> bool {
    IMAGE_URL.is_match(text.trim())
}

/// Pull the `src` out of raw `<img>` markup.
pub fn extract_img_src(html: &str) -> Option<String> {
    let caps = IMG_SRC.captures(html)?;
    let src = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    let src = src.as_str().trim();
    if src.is_empty() {
        None
    } else {
        Some(src.replace("&amp;", "&"))
    }
}

pub fn route_paste(event: PasteEvent) -> PasteRoute {
    match event {
        PasteEvent::Tag { src } if is_in_memory_source(&src) => PasteRoute::ReadThenUploadFile(src),
        PasteEvent::Tag { src } => PasteRoute::UploadUrl(src),
        PasteEvent::Pattern { text } => PasteRoute::UploadUrl(text.trim().to_string()),
        PasteEvent::File(file) => PasteRoute::UploadFile(file),
    }
}
