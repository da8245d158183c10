use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{
    DividendUpdate, FundamentalsUpdate, PriceBarUpdate, TickerSearchResult,
};

use super::models::AssetProfile;

/// Contract every market data source implements. Each operation returns a
/// structured result or a typed error; nothing here panics past the
/// boundary.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current price for a ticker
    async fn get_quote(&self, ticker: &str) -> Result<Decimal, MarketDataError>;

    /// Identity and classification data for a ticker
    async fn get_profile(&self, ticker: &str) -> Result<AssetProfile, MarketDataError>;

    /// Daily OHLCV bars covering the requested period (`1mo`..`max`)
    async fn get_history(
        &self,
        ticker: &str,
        period: &str,
    ) -> Result<Vec<PriceBarUpdate>, MarketDataError>;

    /// Full dividend history for a ticker
    async fn get_dividends(&self, ticker: &str) -> Result<Vec<DividendUpdate>, MarketDataError>;

    /// Current fundamental ratios for a ticker
    async fn get_fundamentals(&self, ticker: &str)
        -> Result<FundamentalsUpdate, MarketDataError>;

    /// Free-text symbol search
    async fn search(&self, query: &str) -> Result<Vec<TickerSearchResult>, MarketDataError>;
}
