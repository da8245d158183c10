use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use crate::db::get_connection;
use crate::schema::{asset_metrics, asset_prices, assets, dividends};

use super::assets_errors::{AssetError, Result};
use super::assets_model::{Asset, AssetDB, NewAsset};
use super::assets_traits::AssetRepositoryTrait;

/// Repository for managing asset records in the database
pub struct AssetRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
}

impl AssetRepository {
    /// Creates a new AssetRepository instance
    pub fn new(pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl AssetRepositoryTrait for AssetRepository {
    /// Creates a new asset in the database
    fn create(&self, new_asset: NewAsset) -> Result<Asset> {
        new_asset.validate()?;
        let asset_db: AssetDB = new_asset.into();

        let mut conn = get_connection(&self.pool)?;

        let result = diesel::insert_into(assets::table)
            .values(&asset_db)
            .get_result::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Retrieves an asset by its ID
    fn get_by_id(&self, asset_id: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        let result = assets::table.find(asset_id).first::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Retrieves an asset by its ticker symbol
    fn get_by_ticker(&self, ticker: &str) -> Result<Asset> {
        let mut conn = get_connection(&self.pool)?;

        let result = assets::table
            .filter(assets::ticker.eq(ticker))
            .first::<AssetDB>(&mut conn)?;

        Ok(result.into())
    }

    /// Lists all assets, ordered by ticker
    fn list(&self) -> Result<Vec<Asset>> {
        let mut conn = get_connection(&self.pool)?;

        let results = assets::table
            .order(assets::ticker.asc())
            .load::<AssetDB>(&mut conn)?;

        Ok(results.into_iter().map(Asset::from).collect())
    }

    /// Deletes an asset together with the price, metric and dividend series
    /// it owns, as one coordinated operation.
    fn delete(&self, asset_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let deleted = conn.transaction(|conn| {
            diesel::delete(dividends::table.filter(dividends::asset_id.eq(asset_id)))
                .execute(conn)?;
            diesel::delete(asset_metrics::table.filter(asset_metrics::asset_id.eq(asset_id)))
                .execute(conn)?;
            diesel::delete(asset_prices::table.filter(asset_prices::asset_id.eq(asset_id)))
                .execute(conn)?;
            diesel::delete(assets::table.find(asset_id)).execute(conn)
        })?;

        if deleted == 0 {
            return Err(AssetError::NotFound(format!(
                "Asset with id {} not found",
                asset_id
            )));
        }

        Ok(())
    }
}
