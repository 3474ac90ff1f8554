//! Market data models consumed by the analytics core.

mod bar;
mod series;
mod symbol;

pub use bar::Bar;
pub use series::{MarketSummary, PriceSeries};
pub use symbol::{AssetClass, Symbol};
