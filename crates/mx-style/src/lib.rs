//! Stylesheet parsing and style-property resolution for the Mx widget toolkit.
//!
//! This crate loads a small CSS dialect, matches its selectors against a
//! widget tree and converts the winning declarations into typed values:
//!
//! - **Selectors**: type, `*`, `#id`, `.class`, `:pseudo-class`, plus child
//!   (`>`) and descendant chains, scored by a fixed specificity
//! - **Resolution**: the most specific rule wins per property; results are
//!   cached per widget state and invalidated when stylesheets change
//! - **Typed values**: colors, integers with point sizes, strings, enums,
//!   border images, padding and font weights
//! - **Hot Reload**: re-read stylesheets when they change on disk
//!
//! # Example
//!
//! ```ignore
//! use mx_style::prelude::*;
//!
//! let mut context = StyleContext::from_env();
//! context.style_mut().load_from_file("themes/app.css")?;
//!
//! // Once per widget
//! let handle = context.style_mut().attach();
//!
//! // Whenever the widget paints
//! let values = context.style_mut().get_properties(handle, &button, &["color", "padding"]);
//! ```

pub mod types;
pub mod style;
pub mod selector;
pub mod rules;
pub mod resolve;
pub mod parser;
pub mod settings;
pub mod widget;

#[cfg(feature = "hot-reload")]
pub mod hot_reload;

mod error;

pub use error::{Error, Result};
pub use resolve::{StylableId, Style};
pub use settings::{StyleContext, StyleSettings};

/// Log targets, for filtering with `tracing-subscriber`.
///
/// ```text
/// RUST_LOG=mx_style::css=trace,mx_style::style_cache=debug
/// ```
pub mod targets {
    /// Selector matching.
    pub const CSS: &str = "mx_style::css";
    /// Cache bookkeeping.
    pub const STYLE_CACHE: &str = "mx_style::style_cache";
    /// Change notification.
    pub const SIGNAL: &str = "mx_style::signal";
}

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::types::{BorderImage, Color, FontWeight, Padding, StyleValue};
    pub use crate::style::{EnumNick, PropertyKind, PropertyManifest, StyleProperty};
    pub use crate::selector::{Specificity, StyleNode, WidgetMatchContext};
    pub use crate::rules::{DeclarationTable, DeclarationValue, StyleSheet};
    pub use crate::resolve::{StylableId, Style, StyleChanged};
    pub use crate::settings::{StyleContext, StyleSettings};
    pub use crate::widget::Stylable;
    pub use crate::{Error, Result};

    #[cfg(feature = "hot-reload")]
    pub use crate::hot_reload::StylesheetWatcher;
}
