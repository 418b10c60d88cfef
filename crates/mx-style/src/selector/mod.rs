//! CSS selector types and matching.

mod matcher;
mod specificity;
mod types;

pub use matcher::{SelectorMatcher, StyleNode, WidgetMatchContext, describe_node};
pub use specificity::{SelectorMatch, Specificity, sort_matches};
pub use types::*;
