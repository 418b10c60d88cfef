//! Style property declarations.

mod properties;

pub use properties::{EnumNick, ParseFn, PropertyKind, PropertyManifest, StyleProperty};
