//! Browser DOM layer for the media block.
//!
//! This crate implements `MediaSurface` over `web-sys` nodes and drives a
//! `MediaBlock` from real DOM events. It assumes a `wasm32-unknown-unknown`
//! target environment.
//!
//! # Architecture
//!
//! - `dom`: node tree, media element, resize handles
//! - `listeners`: grouped `gloo-events` listeners with deferred release
//! - `driver`: event dispatch and background uploads
//! - `fetch`: reading files and `blob:`/`data:` URLs
//! - `picker`: native file picker
//!
//! # Re-exports
//!
//! This crate re-exports `mediablock-core` for convenience, so consumers
//! only need to depend on `mediablock-browser`.

pub use mediablock_core;
pub use mediablock_core::*;

pub mod dom;
pub mod driver;
pub mod fetch;
pub mod listeners;
pub mod picker;

pub use dom::{DomSurface, EventSink};
pub use driver::{BlockDriver, SharedBlock};
pub use fetch::{BrowserBlobReader, read_file};
pub use listeners::{ListenerGroup, ListenerSet};
pub use picker::FilePicker;
