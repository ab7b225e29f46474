//! Filter engine over normalized datasets.
//!
//! - [`FilterSpec`]: immutable selection criteria (symbols, strategies, window)
//! - [`apply`]: pure filtering into an order-preserving [`View`]
//! - [`ViewCache`]: optional cache keyed by dataset identity and filter value

mod cache;
mod engine;
mod spec;

pub use cache::{CacheStats, DEFAULT_CACHE_CAPACITY, ViewCache};
pub use engine::{View, ViewIter, apply};
pub use spec::FilterSpec;
