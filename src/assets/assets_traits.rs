use crate::market_data::PriceBar;

use super::assets_errors::Result;
use super::assets_model::{Asset, AssetDetail, NewAsset};

/// Trait defining the contract for asset repository operations.
pub trait AssetRepositoryTrait: Send + Sync {
    fn create(&self, new_asset: NewAsset) -> Result<Asset>;
    fn get_by_id(&self, asset_id: &str) -> Result<Asset>;
    fn get_by_ticker(&self, ticker: &str) -> Result<Asset>;
    fn list(&self) -> Result<Vec<Asset>>;
    fn delete(&self, asset_id: &str) -> Result<()>;
}

/// Trait defining the contract for asset service operations.
#[async_trait::async_trait]
pub trait AssetServiceTrait: Send + Sync {
    fn get_assets(&self) -> Result<Vec<Asset>>;
    fn get_asset(&self, ticker: &str) -> Result<Asset>;
    async fn get_asset_detail(&self, ticker: &str) -> Result<AssetDetail>;
    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>>;
    async fn get_or_create_asset(&self, ticker: &str) -> Result<Asset>;
    fn delete_asset(&self, asset_id: &str) -> Result<()>;
}
