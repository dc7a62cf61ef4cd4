//! Asset classification.

/// Extensions rendered with a `<video>` element. Matched case-insensitively
/// against the last path segment, ignoring query string and fragment.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v"];

/// How an asset is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify an asset URL by its file extension. Anything that is not a
    /// known video extension is treated as an image.
    pub fn from_url(url: &str) -> Self {
        match extension(url) {
            Some(ext) if VIDEO_EXTENSIONS.iter().any(|v| v.eq_ignore_ascii_case(ext)) => {
                MediaKind::Video
            }
            _ => MediaKind::Image,
        }
    }

    pub fn tag_name(self) -> &'static str {
        match self {
            MediaKind::Image => "img",
            MediaKind::Video => "video",
        }
    }

    /// Event fired when the element has enough data to report its
    /// intrinsic size.
    pub fn ready_event(self) -> &'static str {
        match self {
            MediaKind::Image => "load",
            MediaKind::Video => "loadeddata",
        }
    }

    /// Attributes set on the element before its `src`.
    ///
    /// Videos autoplay muted and inline in a loop with controls visible;
    /// images load lazily and decode off the main thread.
    pub fn attributes(self) -> &'static [(&'static str, &'static str)] {
        match self {
            MediaKind::Image => &[("loading", "lazy"), ("decoding", "async")],
            MediaKind::Video => &[
                ("autoplay", ""),
                ("loop", ""),
                ("muted", ""),
                ("playsinline", ""),
                ("controls", ""),
            ],
        }
    }
}

fn extension(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let segment = path.rsplit('/').next().unwrap_or(path);
    let (_, ext) = segment.rsplit_once('.')?;
    if ext.is_empty() { None } else { Some(ext) }
}
