use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;

use super::market_data_cache::MarketDataCache;
use super::market_data_errors::Result;
use super::market_data_model::{
    AssetMetricSnapshot, DividendEvent, PriceBar, SyncReport, TickerSearchResult,
};
use super::market_data_traits::{MarketDataRepositoryTrait, MarketDataServiceTrait};
use super::providers::market_data_provider::MarketDataProvider;
use super::providers::models::AssetProfile;
use crate::assets::assets_model::{Asset, NewAsset};
use crate::assets::assets_traits::AssetRepositoryTrait;
use crate::assets::AssetError;

pub struct MarketDataService {
    repository: Arc<dyn MarketDataRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    provider: Arc<dyn MarketDataProvider>,
    cache: MarketDataCache,
}

impl MarketDataService {
    pub fn new(
        repository: Arc<dyn MarketDataRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
    ) -> Self {
        Self::with_cache(
            repository,
            asset_repository,
            provider,
            MarketDataCache::default(),
        )
    }

    pub fn with_cache(
        repository: Arc<dyn MarketDataRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        provider: Arc<dyn MarketDataProvider>,
        cache: MarketDataCache,
    ) -> Self {
        Self {
            repository,
            asset_repository,
            provider,
            cache,
        }
    }

    /// Looks the asset up by ticker, creating it from the provider profile
    /// on first sight. The bool reports whether a row was created.
    async fn resolve_asset(&self, ticker: &str) -> Result<(Asset, bool)> {
        match self.asset_repository.get_by_ticker(ticker) {
            Ok(asset) => Ok((asset, false)),
            Err(AssetError::NotFound(_)) => {
                let profile = self.get_asset_profile(ticker).await?;
                let new_asset = NewAsset::from(profile);

                match self.asset_repository.create(new_asset) {
                    Ok(asset) => Ok((asset, true)),
                    // Another sync won the insert race, use its row
                    Err(AssetError::AlreadyExists(_)) => {
                        Ok((self.asset_repository.get_by_ticker(ticker)?, false))
                    }
                    Err(err) => Err(err.into()),
                }
            }
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl MarketDataServiceTrait for MarketDataService {
    async fn get_current_price(&self, asset: &Asset) -> Result<Option<Decimal>> {
        let today = Utc::now().date_naive();

        if let Some(bar) = self.repository.get_bar_on_date(&asset.id, today)? {
            return Ok(Some(bar.close));
        }

        match self
            .cache
            .quote_or_fetch(&asset.ticker, || self.provider.get_quote(&asset.ticker))
            .await
        {
            Ok(price) => return Ok(Some(price)),
            Err(err) => {
                debug!("Live quote unavailable for {}: {}", asset.ticker, err);
            }
        }

        if let Some(bar) = self.repository.get_latest_bar(&asset.id)? {
            debug!(
                "Falling back to stored close from {} for {}",
                bar.date, asset.ticker
            );
            return Ok(Some(bar.close));
        }

        Ok(None)
    }

    async fn get_asset_profile(&self, ticker: &str) -> Result<AssetProfile> {
        self.cache
            .profile_or_fetch(ticker, || self.provider.get_profile(ticker))
            .await
    }

    async fn sync_asset(&self, ticker: &str, period: &str) -> Result<SyncReport> {
        info!("Syncing market data for {} over {}", ticker, period);

        let (asset, asset_created) = self.resolve_asset(ticker).await?;

        // All provider calls complete before any row is touched, so a
        // fetch failure leaves the stored series intact
        let bars = self.provider.get_history(ticker, period).await?;
        let fundamentals = self.provider.get_fundamentals(ticker).await?;
        let dividend_events = self.provider.get_dividends(ticker).await?;

        let today = Utc::now().date_naive();
        self.repository.replace_asset_series(
            &asset.id,
            &bars,
            today,
            &fundamentals,
            &dividend_events,
        )?;

        info!(
            "Synced {}: {} price bars, {} dividends",
            ticker,
            bars.len(),
            dividend_events.len()
        );

        Ok(SyncReport {
            asset_id: asset.id,
            ticker: asset.ticker,
            asset_created,
            price_count: bars.len(),
            dividend_count: dividend_events.len(),
        })
    }

    async fn search_ticker(&self, query: &str) -> Result<Vec<TickerSearchResult>> {
        self.provider.search(query).await
    }

    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>> {
        self.repository.get_price_history(asset_id)
    }

    fn get_latest_metrics(&self, asset_id: &str) -> Result<Option<AssetMetricSnapshot>> {
        self.repository.get_latest_metrics(asset_id)
    }

    fn get_dividend_history(&self, asset_id: &str) -> Result<Vec<DividendEvent>> {
        self.repository.get_dividend_history(asset_id)
    }
}
