use log::{debug, error};
use std::sync::Arc;

use crate::market_data::market_data_constants::DEFAULT_HISTORY_PERIOD;
use crate::market_data::{MarketDataServiceTrait, PriceBar};

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetDetail};
use super::assets_traits::{AssetRepositoryTrait, AssetServiceTrait};

/// Service for managing assets
pub struct AssetService {
    repository: Arc<dyn AssetRepositoryTrait>,
    market_data_service: Arc<dyn MarketDataServiceTrait>,
}

impl AssetService {
    /// Creates a new AssetService instance
    pub fn new(
        repository: Arc<dyn AssetRepositoryTrait>,
        market_data_service: Arc<dyn MarketDataServiceTrait>,
    ) -> Self {
        Self {
            repository,
            market_data_service,
        }
    }
}

#[async_trait::async_trait]
impl AssetServiceTrait for AssetService {
    /// Lists all tracked assets
    fn get_assets(&self) -> Result<Vec<Asset>> {
        self.repository.list()
    }

    /// Retrieves an asset by its ticker
    fn get_asset(&self, ticker: &str) -> Result<Asset> {
        self.repository.get_by_ticker(ticker)
    }

    /// Retrieves an asset together with its current price, latest metric
    /// snapshot and dividend history
    async fn get_asset_detail(&self, ticker: &str) -> Result<AssetDetail> {
        debug!("Fetching asset detail for ticker: {}", ticker);

        let asset = self.repository.get_by_ticker(ticker)?;

        let current_price = self.market_data_service.get_current_price(&asset).await?;
        let metrics = self.market_data_service.get_latest_metrics(&asset.id)?;
        let dividends = self.market_data_service.get_dividend_history(&asset.id)?;

        Ok(AssetDetail {
            asset,
            current_price,
            metrics,
            dividends,
        })
    }

    /// Returns the stored daily price history for an asset, oldest first
    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>> {
        Ok(self.market_data_service.get_price_history(asset_id)?)
    }

    /// Retrieves an asset by ticker, creating it from the provider profile
    /// when it is not yet tracked
    async fn get_or_create_asset(&self, ticker: &str) -> Result<Asset> {
        match self.repository.get_by_ticker(ticker) {
            Ok(existing_asset) => Ok(existing_asset),
            Err(AssetError::NotFound(_)) => {
                match self.market_data_service.get_asset_profile(ticker).await {
                    Ok(profile) => {
                        let inserted_asset = match self.repository.create(profile.into()) {
                            Ok(asset) => asset,
                            // A concurrent caller won the insert race
                            Err(AssetError::AlreadyExists(_)) => {
                                self.repository.get_by_ticker(ticker)?
                            }
                            Err(e) => return Err(e),
                        };

                        // Seed market data for the new asset but don't fail if sync fails
                        if let Err(e) = self
                            .market_data_service
                            .sync_asset(ticker, DEFAULT_HISTORY_PERIOD)
                            .await
                        {
                            error!(
                                "Failed to sync market data for new asset {}: {}",
                                inserted_asset.ticker, e
                            );
                        }
                        Ok(inserted_asset)
                    }
                    Err(e) => {
                        error!("No provider data found for ticker: {}", ticker);
                        Err(AssetError::MarketDataError(e.to_string()))
                    }
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Deletes an asset and the series it owns
    fn delete_asset(&self, asset_id: &str) -> Result<()> {
        self.repository.delete(asset_id)
    }
}
