//! Declaration blocks and stylesheets.

mod declaration;
mod stylesheet;

pub use declaration::{DeclarationTable, DeclarationValue};
pub use stylesheet::StyleSheet;
