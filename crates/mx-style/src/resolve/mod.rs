//! Style resolution engine.

mod cache;
mod engine;
mod signal;
mod transform;

pub use cache::{CacheStats, StyleCache};
pub use engine::{CACHE_SLOTS_PER_STYLABLE, DEFAULT_RESOLUTION, StylableId, Style, StyleChanged};
pub use signal::{ConnectionId, Signal};
pub use transform::{normalize_property_name, transform_value};
