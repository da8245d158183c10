use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::market_data_errors::{MarketDataError, Result};
use super::market_data_model::{
    AssetMetricSnapshot, AssetMetricSnapshotDB, DividendEvent, DividendEventDB, DividendUpdate,
    FundamentalsUpdate, PriceBar, PriceBarDB, PriceBarUpdate,
};
use super::market_data_traits::MarketDataRepositoryTrait;
use crate::db::get_connection;
use crate::schema::{asset_metrics, asset_prices, dividends};

pub struct MarketDataRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl MarketDataRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl MarketDataRepositoryTrait for MarketDataRepository {
    fn get_bar_on_date(&self, asset_id: &str, date: NaiveDate) -> Result<Option<PriceBar>> {
        let mut conn = get_connection(&self.pool)?;

        asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .filter(asset_prices::date.eq(date))
            .first::<PriceBarDB>(&mut conn)
            .optional()
            .map(|bar| bar.map(PriceBar::from))
            .map_err(MarketDataError::DatabaseError)
    }

    fn get_latest_bar(&self, asset_id: &str) -> Result<Option<PriceBar>> {
        let mut conn = get_connection(&self.pool)?;

        asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .order(asset_prices::date.desc())
            .first::<PriceBarDB>(&mut conn)
            .optional()
            .map(|bar| bar.map(PriceBar::from))
            .map_err(MarketDataError::DatabaseError)
    }

    fn get_price_history(&self, asset_id: &str) -> Result<Vec<PriceBar>> {
        let mut conn = get_connection(&self.pool)?;

        asset_prices::table
            .filter(asset_prices::asset_id.eq(asset_id))
            .order(asset_prices::date.asc())
            .load::<PriceBarDB>(&mut conn)
            .map(|bars| bars.into_iter().map(PriceBar::from).collect())
            .map_err(MarketDataError::DatabaseError)
    }

    fn get_latest_metrics(&self, asset_id: &str) -> Result<Option<AssetMetricSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        asset_metrics::table
            .filter(asset_metrics::asset_id.eq(asset_id))
            .order(asset_metrics::date.desc())
            .first::<AssetMetricSnapshotDB>(&mut conn)
            .optional()
            .map(|snapshot| snapshot.map(AssetMetricSnapshot::from))
            .map_err(MarketDataError::DatabaseError)
    }

    fn get_dividend_history(&self, asset_id: &str) -> Result<Vec<DividendEvent>> {
        let mut conn = get_connection(&self.pool)?;

        dividends::table
            .filter(dividends::asset_id.eq(asset_id))
            .order(dividends::ex_date.asc())
            .load::<DividendEventDB>(&mut conn)
            .map(|events| events.into_iter().map(DividendEvent::from).collect())
            .map_err(MarketDataError::DatabaseError)
    }

    fn replace_asset_series(
        &self,
        asset_id: &str,
        bars: &[PriceBarUpdate],
        metrics_date: NaiveDate,
        fundamentals: &FundamentalsUpdate,
        dividend_events: &[DividendUpdate],
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(asset_prices::table.filter(asset_prices::asset_id.eq(asset_id)))
                .execute(conn)?;

            // Batched to keep the bind count under the SQLite limit
            for chunk in bars.chunks(100) {
                let rows: Vec<PriceBarDB> = chunk
                    .iter()
                    .map(|bar| PriceBarDB::from_update(asset_id, bar.clone()))
                    .collect();

                diesel::insert_into(asset_prices::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            diesel::delete(asset_metrics::table.filter(asset_metrics::asset_id.eq(asset_id)))
                .execute(conn)?;

            let snapshot =
                AssetMetricSnapshotDB::from_update(asset_id, metrics_date, fundamentals.clone());
            diesel::insert_into(asset_metrics::table)
                .values(&snapshot)
                .execute(conn)?;

            diesel::delete(dividends::table.filter(dividends::asset_id.eq(asset_id)))
                .execute(conn)?;

            for chunk in dividend_events.chunks(100) {
                let rows: Vec<DividendEventDB> = chunk
                    .iter()
                    .map(|event| DividendEventDB::from_update(asset_id, event.clone()))
                    .collect();

                diesel::insert_into(dividends::table)
                    .values(&rows)
                    .execute(conn)?;
            }

            Ok(())
        })
        .map_err(MarketDataError::DatabaseError)
    }
}
