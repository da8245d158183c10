pub mod market_data_provider;
pub mod models;
pub mod yahoo_provider;

pub use market_data_provider::MarketDataProvider;
pub use yahoo_provider::YahooProvider;
