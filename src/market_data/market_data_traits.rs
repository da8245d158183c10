use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::market_data_errors::Result;
use super::market_data_model::{
    AssetMetricSnapshot, DividendEvent, DividendUpdate, FundamentalsUpdate, PriceBar,
    PriceBarUpdate, SyncReport, TickerSearchResult,
};
use super::providers::models::AssetProfile;
use crate::assets::assets_model::Asset;

#[async_trait]
pub trait MarketDataServiceTrait: Send + Sync {
    /// Resolves the asset's current price: today's stored bar, then the
    /// quote cache/provider, then the latest stored close, then `None`.
    async fn get_current_price(&self, asset: &Asset) -> Result<Option<Decimal>>;
    async fn get_asset_profile(&self, ticker: &str) -> Result<AssetProfile>;
    async fn sync_asset(&self, ticker: &str, period: &str) -> Result<SyncReport>;
    async fn search_ticker(&self, query: &str) -> Result<Vec<TickerSearchResult>>;
    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>>;
    fn get_latest_metrics(&self, asset_id: &str) -> Result<Option<AssetMetricSnapshot>>;
    fn get_dividend_history(&self, asset_id: &str) -> Result<Vec<DividendEvent>>;
}

pub trait MarketDataRepositoryTrait: Send + Sync {
    fn get_bar_on_date(&self, asset_id: &str, date: NaiveDate) -> Result<Option<PriceBar>>;
    fn get_latest_bar(&self, asset_id: &str) -> Result<Option<PriceBar>>;
    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>>;
    fn get_latest_metrics(&self, asset_id: &str) -> Result<Option<AssetMetricSnapshot>>;
    fn get_dividend_history(&self, asset_id: &str) -> Result<Vec<DividendEvent>>;
    /// Replaces the price, metric and dividend series for an asset in a
    /// single transaction.
    fn replace_asset_series(
        &self,
        asset_id: &str,
        bars: &[PriceBarUpdate],
        metrics_date: NaiveDate,
        fundamentals: &FundamentalsUpdate,
        dividend_events: &[DividendUpdate],
    ) -> Result<()>;
}
