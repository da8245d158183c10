pub mod holdings_aggregator;
pub mod holdings_model;

pub use holdings_aggregator::*;
pub use holdings_model::*;
