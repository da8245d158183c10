use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::assets::assets_errors::Result as AssetsResult;
use crate::assets::assets_model::{Asset, AssetType, NewAsset};
use crate::assets::assets_traits::AssetRepositoryTrait;
use crate::assets::AssetError;
use crate::market_data::market_data_errors::{MarketDataError, Result as MarketResult};
use crate::market_data::market_data_model::{
    AssetMetricSnapshot, DividendEvent, DividendUpdate, FundamentalsUpdate, PriceBar,
    PriceBarUpdate, TickerSearchResult,
};
use crate::market_data::market_data_service::MarketDataService;
use crate::market_data::market_data_traits::{MarketDataRepositoryTrait, MarketDataServiceTrait};
use crate::market_data::providers::market_data_provider::MarketDataProvider;
use crate::market_data::providers::models::AssetProfile;

// --- Mock provider ---

#[derive(Default)]
struct MockProvider {
    quote: Option<Decimal>,
    profile: Option<AssetProfile>,
    history: Vec<PriceBarUpdate>,
    dividends: Vec<DividendUpdate>,
    fundamentals: FundamentalsUpdate,
    fail_history: bool,
    quote_calls: AtomicUsize,
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    async fn get_quote(&self, ticker: &str) -> Result<Decimal, MarketDataError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn get_profile(&self, ticker: &str) -> Result<AssetProfile, MarketDataError> {
        self.profile
            .clone()
            .ok_or_else(|| MarketDataError::NotFound(ticker.to_string()))
    }

    async fn get_history(
        &self,
        ticker: &str,
        _period: &str,
    ) -> Result<Vec<PriceBarUpdate>, MarketDataError> {
        if self.fail_history {
            return Err(MarketDataError::ProviderError(format!(
                "history unavailable for {}",
                ticker
            )));
        }
        Ok(self.history.clone())
    }

    async fn get_dividends(&self, _ticker: &str) -> Result<Vec<DividendUpdate>, MarketDataError> {
        Ok(self.dividends.clone())
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

// --- In-memory market data repository ---

#[derive(Default)]
struct MockMarketDataRepository {
    bars: Mutex<Vec<PriceBar>>,
    metrics: Mutex<Vec<AssetMetricSnapshot>>,
    dividends: Mutex<Vec<DividendEvent>>,
}

impl MockMarketDataRepository {
    fn seed_bar(&self, asset_id: &str, date: NaiveDate, close: Decimal) {
        self.bars.lock().unwrap().push(PriceBar {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
            created_at: Utc::now(),
        });
    }
}

impl MarketDataRepositoryTrait for MockMarketDataRepository {
    fn get_bar_on_date(&self, asset_id: &str, date: NaiveDate) -> MarketResult<Option<PriceBar>> {
        Ok(self
            .bars
            .lock()
            .unwrap()
            .iter()
            .find(|bar| bar.asset_id == asset_id && bar.date == date)
            .cloned())
    }

    fn get_latest_bar(&self, asset_id: &str) -> MarketResult<Option<PriceBar>> {
        Ok(self
            .bars
            .lock()
            .unwrap()
            .iter()
            .filter(|bar| bar.asset_id == asset_id)
            .max_by_key(|bar| bar.date)
            .cloned())
    }

    fn get_price_history(&self, asset_id: &str) -> MarketResult<Vec<PriceBar>> {
        let mut bars: Vec<PriceBar> = self
            .bars
            .lock()
            .unwrap()
            .iter()
            .filter(|bar| bar.asset_id == asset_id)
            .cloned()
            .collect();
        bars.sort_by_key(|bar| bar.date);
        Ok(bars)
    }

    fn get_latest_metrics(&self, asset_id: &str) -> MarketResult<Option<AssetMetricSnapshot>> {
        Ok(self
            .metrics
            .lock()
            .unwrap()
            .iter()
            .filter(|snapshot| snapshot.asset_id == asset_id)
            .max_by_key(|snapshot| snapshot.date)
            .cloned())
    }

    fn get_dividend_history(&self, asset_id: &str) -> MarketResult<Vec<DividendEvent>> {
        let mut events: Vec<DividendEvent> = self
            .dividends
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.asset_id == asset_id)
            .cloned()
            .collect();
        events.sort_by_key(|event| event.ex_date);
        Ok(events)
    }

    fn replace_asset_series(
        &self,
        asset_id: &str,
        bars: &[PriceBarUpdate],
        metrics_date: NaiveDate,
        fundamentals: &FundamentalsUpdate,
        dividend_events: &[DividendUpdate],
    ) -> MarketResult<()> {
        let now = Utc::now();

        let mut stored_bars = self.bars.lock().unwrap();
        stored_bars.retain(|bar| bar.asset_id != asset_id);
        for bar in bars {
            stored_bars.push(PriceBar {
                id: Uuid::new_v4().to_string(),
                asset_id: asset_id.to_string(),
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
                volume: bar.volume,
                created_at: now,
            });
        }

        let mut stored_metrics = self.metrics.lock().unwrap();
        stored_metrics.retain(|snapshot| snapshot.asset_id != asset_id);
        stored_metrics.push(AssetMetricSnapshot {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            date: metrics_date,
            pe_ratio: fundamentals.pe_ratio,
            pb_ratio: fundamentals.pb_ratio,
            dividend_yield: fundamentals.dividend_yield,
            market_cap: fundamentals.market_cap,
            eps: fundamentals.eps,
            revenue: fundamentals.revenue,
            profit_margin: fundamentals.profit_margin,
            debt_to_equity: fundamentals.debt_to_equity,
            created_at: now,
        });

        let mut stored_dividends = self.dividends.lock().unwrap();
        stored_dividends.retain(|event| event.asset_id != asset_id);
        for event in dividend_events {
            stored_dividends.push(DividendEvent {
                id: Uuid::new_v4().to_string(),
                asset_id: asset_id.to_string(),
                ex_date: event.ex_date,
                payment_date: event.payment_date,
                amount: event.amount,
                created_at: now,
            });
        }

        Ok(())
    }
}

// --- In-memory asset repository ---

#[derive(Default)]
struct MockAssetRepository {
    assets: Mutex<Vec<Asset>>,
}

impl MockAssetRepository {
    fn seed(&self, id: &str, ticker: &str) -> Asset {
        let now = Utc::now();
        let asset = Asset {
            id: id.to_string(),
            ticker: ticker.to_string(),
            name: format!("{} Inc.", ticker),
            asset_type: AssetType::Stock,
            currency: "USD".to_string(),
            exchange: None,
            sector: None,
            industry: None,
            created_at: now,
            updated_at: now,
        };
        self.assets.lock().unwrap().push(asset.clone());
        asset
    }
}

impl AssetRepositoryTrait for MockAssetRepository {
    fn create(&self, new_asset: NewAsset) -> AssetsResult<Asset> {
        let mut assets = self.assets.lock().unwrap();
        if assets.iter().any(|asset| asset.ticker == new_asset.ticker) {
            return Err(AssetError::AlreadyExists(new_asset.ticker));
        }

        let now = Utc::now();
        let asset = Asset {
            id: new_asset
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ticker: new_asset.ticker,
            name: new_asset.name,
            asset_type: new_asset.asset_type,
            currency: new_asset.currency,
            exchange: new_asset.exchange,
            sector: new_asset.sector,
            industry: new_asset.industry,
            created_at: now,
            updated_at: now,
        };
        assets.push(asset.clone());
        Ok(asset)
    }

    fn get_by_id(&self, asset_id: &str) -> AssetsResult<Asset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|asset| asset.id == asset_id)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(asset_id.to_string()))
    }

    fn get_by_ticker(&self, ticker: &str) -> AssetsResult<Asset> {
        self.assets
            .lock()
            .unwrap()
            .iter()
            .find(|asset| asset.ticker == ticker)
            .cloned()
            .ok_or_else(|| AssetError::NotFound(ticker.to_string()))
    }

    fn list(&self) -> AssetsResult<Vec<Asset>> {
        Ok(self.assets.lock().unwrap().clone())
    }

    fn delete(&self, asset_id: &str) -> AssetsResult<()> {
        let mut assets = self.assets.lock().unwrap();
        let before = assets.len();
        assets.retain(|asset| asset.id != asset_id);
        if assets.len() == before {
            return Err(AssetError::NotFound(asset_id.to_string()));
        }
        Ok(())
    }
}

// --- Fixtures ---

fn profile(ticker: &str) -> AssetProfile {
    AssetProfile {
        ticker: ticker.to_string(),
        name: Some(format!("{} Inc.", ticker)),
        asset_type: AssetType::Stock,
        currency: Some("USD".to_string()),
        exchange: Some("NMS".to_string()),
        sector: None,
        industry: None,
    }
}

fn bar_update(date: NaiveDate, close: Decimal) -> PriceBarUpdate {
    PriceBarUpdate {
        date,
        open: None,
        high: None,
        low: None,
        close,
        volume: Some(1_000),
    }
}

fn build_service(
    provider: MockProvider,
) -> (
    MarketDataService,
    Arc<MockMarketDataRepository>,
    Arc<MockAssetRepository>,
    Arc<MockProvider>,
) {
    let repository = Arc::new(MockMarketDataRepository::default());
    let asset_repository = Arc::new(MockAssetRepository::default());
    let provider = Arc::new(provider);

    let service = MarketDataService::new(
        repository.clone(),
        asset_repository.clone(),
        provider.clone(),
    );

    (service, repository, asset_repository, provider)
}

// --- Price resolution ---

#[tokio::test]
async fn test_current_price_prefers_same_day_stored_bar() {
    let (service, repository, asset_repository, provider) = build_service(MockProvider {
        quote: Some(dec!(999)),
        ..Default::default()
    });
    let asset = asset_repository.seed("asset-1", "AAPL");
    repository.seed_bar("asset-1", Utc::now().date_naive(), dec!(101.5));

    let price = service.get_current_price(&asset).await.unwrap();

    assert_eq!(price, Some(dec!(101.5)));
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_current_price_falls_back_to_provider_quote() {
    let (service, repository, asset_repository, provider) = build_service(MockProvider {
        quote: Some(dec!(105)),
        ..Default::default()
    });
    let asset = asset_repository.seed("asset-1", "AAPL");
    let yesterday = Utc::now().date_naive() - Duration::days(1);
    repository.seed_bar("asset-1", yesterday, dec!(95));

    let price = service.get_current_price(&asset).await.unwrap();

    assert_eq!(price, Some(dec!(105)));
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_current_price_serves_stale_close_when_provider_fails() {
    let (service, repository, asset_repository, _provider) =
        build_service(MockProvider::default());
    let asset = asset_repository.seed("asset-1", "AAPL");
    let last_week = Utc::now().date_naive() - Duration::days(7);
    repository.seed_bar("asset-1", last_week, dec!(95));

    let price = service.get_current_price(&asset).await.unwrap();

    assert_eq!(price, Some(dec!(95)));
}

#[tokio::test]
async fn test_current_price_absent_without_any_source() {
    let (service, _repository, asset_repository, _provider) =
        build_service(MockProvider::default());
    let asset = asset_repository.seed("asset-1", "AAPL");

    let price = service.get_current_price(&asset).await.unwrap();

    assert_eq!(price, None);
}

#[tokio::test]
async fn test_current_price_reuses_cached_quote() {
    let (service, _repository, asset_repository, provider) = build_service(MockProvider {
        quote: Some(dec!(105)),
        ..Default::default()
    });
    let asset = asset_repository.seed("asset-1", "AAPL");

    let first = service.get_current_price(&asset).await.unwrap();
    let second = service.get_current_price(&asset).await.unwrap();

    assert_eq!(first, Some(dec!(105)));
    assert_eq!(second, Some(dec!(105)));
    assert_eq!(provider.quote_calls.load(Ordering::SeqCst), 1);
}

// --- Synchronization ---

#[tokio::test]
async fn test_sync_creates_asset_and_stores_series() {
    let date_a = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let date_b = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();

    let (service, repository, asset_repository, _provider) = build_service(MockProvider {
        profile: Some(profile("AAPL")),
        history: vec![bar_update(date_a, dec!(100)), bar_update(date_b, dec!(102))],
        dividends: vec![DividendUpdate {
            ex_date: date_a,
            payment_date: None,
            amount: dec!(0.24),
        }],
        fundamentals: FundamentalsUpdate {
            pe_ratio: Some(dec!(28.4)),
            ..Default::default()
        },
        ..Default::default()
    });

    let report = service.sync_asset("AAPL", "1y").await.unwrap();

    assert!(report.asset_created);
    assert_eq!(report.ticker, "AAPL");
    assert_eq!(report.price_count, 2);
    assert_eq!(report.dividend_count, 1);

    let asset = asset_repository.get_by_ticker("AAPL").unwrap();
    assert_eq!(asset.id, report.asset_id);

    let history = repository.get_price_history(&asset.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].close, dec!(100));

    let metrics = repository.get_latest_metrics(&asset.id).unwrap().unwrap();
    assert_eq!(metrics.pe_ratio, Some(dec!(28.4)));

    let dividends = repository.get_dividend_history(&asset.id).unwrap();
    assert_eq!(dividends.len(), 1);
    assert_eq!(dividends[0].amount, dec!(0.24));
}

#[tokio::test]
async fn test_sync_replaces_previous_series_wholesale() {
    let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
    let february_a = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
    let february_b = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();

    let (service, repository, asset_repository, _provider) = build_service(MockProvider {
        profile: Some(profile("AAPL")),
        history: vec![
            bar_update(february_a, dec!(110)),
            bar_update(february_b, dec!(111)),
        ],
        ..Default::default()
    });
    let asset = asset_repository.seed("asset-1", "AAPL");
    repository.seed_bar(&asset.id, january, dec!(100));

    let report = service.sync_asset("AAPL", "1mo").await.unwrap();

    assert!(!report.asset_created);
    assert_eq!(report.price_count, 2);

    let history = repository.get_price_history(&asset.id).unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|bar| bar.date >= february_a));
}

#[tokio::test]
async fn test_sync_fetch_failure_leaves_stored_series_untouched() {
    let january = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

    let (service, repository, asset_repository, _provider) = build_service(MockProvider {
        profile: Some(profile("AAPL")),
        fail_history: true,
        ..Default::default()
    });
    let asset = asset_repository.seed("asset-1", "AAPL");
    repository.seed_bar(&asset.id, january, dec!(100));

    let result = service.sync_asset("AAPL", "1y").await;

    assert!(matches!(result, Err(MarketDataError::ProviderError(_))));
    let history = repository.get_price_history(&asset.id).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].close, dec!(100));
}

#[tokio::test]
async fn test_sync_unknown_ticker_creates_nothing() {
    let (service, _repository, asset_repository, _provider) =
        build_service(MockProvider::default());

    let result = service.sync_asset("NOPE", "1y").await;

    assert!(matches!(result, Err(MarketDataError::NotFound(_))));
    assert!(asset_repository.list().unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_history_failure_still_creates_asset() {
    let (service, repository, asset_repository, _provider) = build_service(MockProvider {
        profile: Some(profile("NEWCO")),
        fail_history: true,
        ..Default::default()
    });

    let result = service.sync_asset("NEWCO", "1y").await;

    // The asset row is committed before the series fetches run, so it
    // survives the failed sync with an empty series.
    assert!(matches!(result, Err(MarketDataError::ProviderError(_))));
    let asset = asset_repository.get_by_ticker("NEWCO").unwrap();
    assert!(repository.get_price_history(&asset.id).unwrap().is_empty());
}
