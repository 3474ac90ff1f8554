//! Infrastructure layer: price history adapters.
//!
//! - `in_memory`: symbol-keyed store for tests and embedding callers
//! - `json_file`: bar files on disk
//! - `cache`: TTL decorator over any provider

mod cache;
mod in_memory;
mod json_file;

pub use cache::{CachedPriceHistory, DEFAULT_TTL};
pub use in_memory::InMemoryPriceHistory;
pub use json_file::JsonFilePriceHistory;
