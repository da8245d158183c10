use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tempfile::TempDir;

use portfolio_monitor_core::assets::AssetType;
use portfolio_monitor_core::db::{self, DbPool};
use portfolio_monitor_core::market_data::{
    AssetProfile, DividendUpdate, FundamentalsUpdate, MarketDataError, MarketDataProvider,
    PriceBarUpdate, TickerSearchResult,
};

/// Migrated database backed by a temp directory. The directory is owned
/// here so it outlives every connection handed out by the pool.
pub struct TestDb {
    pub pool: Arc<DbPool>,
    _dir: TempDir,
}

pub fn setup_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let data_dir = dir.path().to_str().expect("Temp path is not UTF-8");

    let db_path = db::init(data_dir).expect("Failed to initialize database");
    let pool = db::create_pool(&db_path).expect("Failed to create database pool");
    db::run_migrations(&pool).expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

/// Deterministic stand-in for the network provider. Profiles are
/// synthesized from the ticker; quotes, history and dividends are
/// whatever the test loaded into the maps.
#[derive(Default)]
pub struct StubProvider {
    pub quotes: HashMap<String, Decimal>,
    pub history: HashMap<String, Vec<PriceBarUpdate>>,
    pub dividends: HashMap<String, Vec<DividendUpdate>>,
    pub fundamentals: FundamentalsUpdate,
}

#[async_trait]
impl MarketDataProvider for StubProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        self.quotes
            .get(ticker)
            .copied()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn get_profile(&self, ticker: &str) -> Result<AssetProfile, MarketDataError> {
        Ok(AssetProfile {
            ticker: ticker.to_string(),
            name: Some(format!("{} Inc.", ticker)),
            asset_type: AssetType::Stock,
            currency: Some("USD".to_string()),
            exchange: Some("NMS".to_string()),
            sector: None,
            industry: None,
        })
    }

    async fn get_history(
        &self,
        ticker: &str,
        _period: &str,
    ) -> Result<Vec<PriceBarUpdate>, MarketDataError> {
        Ok(self.history.get(ticker).cloned().unwrap_or_default())
    }

    async fn get_dividends(&self, ticker: &str) -> Result<Vec<DividendUpdate>, MarketDataError> {
        Ok(self.dividends.get(ticker).cloned().unwrap_or_default())
    }

    async fn get_fundamentals(
        &self,
        _ticker: &str,
    ) -> Result<FundamentalsUpdate, MarketDataError> {
        Ok(self.fundamentals.clone())
    }

    async fn search(&self, _query: &str) -> Result<Vec<TickerSearchResult>, MarketDataError> {
        Ok(Vec::new())
    }
}
