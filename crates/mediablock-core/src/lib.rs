//! mediablock-core: platform-free logic for the image/video editor block.
//!
//! This crate provides:
//! - `BlockData` - the persisted block shape, with opaque asset passthrough
//! - `SavedWidth` / `AspectRatio` - the responsive dimension model
//! - `ResizeState` - the drag-handle state machine
//! - `Presentation<S>` - render state + resize handling over a `MediaSurface`
//! - `MediaBlock<S>` - the coordinator that owns `BlockData`
//! - `Transport<U>` - envelope normalization over an `Uploader`
//!
//! Everything that touches a real DOM lives behind the `MediaSurface` trait so
//! the same logic can be driven by the browser layer or by a test double.

pub mod block;
pub mod config;
pub mod data;
pub mod dimension;
pub mod host;
pub mod http;
pub mod ingest;
pub mod media;
pub mod paste;
pub mod presentation;
pub mod resize;
pub mod state;
pub mod surface;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use block::{BlockEffect, MediaBlock, UploadOutcome, UploadTicket, caption_enabled};
pub use config::{ActionDescriptor, ConfigError, Endpoints, Features, ToolConfig};
pub use data::{AssetFile, BlockData};
pub use dimension::{
    AspectRatio, CssWidth, LEGACY_PIXEL_THRESHOLD, MIN_MEDIA_WIDTH, MediaSize, SavedWidth,
    width_percent,
};
pub use host::{HostApi, NotifyStyle, StyleClasses};
pub use http::HttpUploader;
pub use ingest::{ingest_paste, upload_file, upload_url};
pub use media::MediaKind;
pub use paste::{PasteEvent, PasteRoute, is_in_memory_source, matches_image_url, route_paste};
pub use presentation::Presentation;
pub use resize::{Rect, ResizeHandle, ResizeSession, ResizeState, resized_width};
pub use smol_str::SmolStr;
pub use state::RenderState;
pub use surface::{MediaSurface, PlatformError, SurfaceEvent, SurfaceLayout};
pub use transport::{BlobReader, Transport, UploadError, UploadFile, Uploader, parse_envelope};
