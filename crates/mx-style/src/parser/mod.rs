//! CSS parsing module.

mod css_parser;
mod error;

pub use css_parser::{ParsedRule, ParseOutcome, parse_css};
pub use error::ParseError;
