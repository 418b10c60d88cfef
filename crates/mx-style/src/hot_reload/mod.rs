//! Reloading stylesheets when they change on disk.
//!
//! Requires the `hot-reload` feature.

mod watcher;

pub use watcher::{ChangeKind, StylesheetChangeEvent, StylesheetWatcher};
