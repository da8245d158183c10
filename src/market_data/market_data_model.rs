use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// One calendar day's OHLCV bar for an asset. Only the close is guaranteed;
/// providers omit the rest for some instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
    pub created_at: DateTime<Utc>,
}

/// A provider-supplied bar before it is attached to an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBarUpdate {
    pub date: NaiveDate,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Decimal,
    pub volume: Option<i64>,
}

/// Database model for price bars
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_prices)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceBarDB {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub open: Option<String>,
    pub high: Option<String>,
    pub low: Option<String>,
    pub close: String,
    pub volume: Option<i64>,
    pub created_at: NaiveDateTime,
}

impl PriceBarDB {
    pub fn from_update(asset_id: &str, update: PriceBarUpdate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            date: update.date,
            open: update.open.map(|d| d.to_string()),
            high: update.high.map(|d| d.to_string()),
            low: update.low.map(|d| d.to_string()),
            close: update.close.to_string(),
            volume: update.volume,
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl From<PriceBarDB> for PriceBar {
    fn from(db: PriceBarDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            date: db.date,
            open: parse_optional_decimal(db.open.as_deref()),
            high: parse_optional_decimal(db.high.as_deref()),
            low: parse_optional_decimal(db.low.as_deref()),
            close: parse_decimal(&db.close),
            volume: db.volume,
            created_at: db.created_at.and_utc(),
        }
    }
}

/// As-of-date snapshot of an asset's fundamental ratios, each independently
/// nullable because providers report them unevenly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMetricSnapshot {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub pe_ratio: Option<Decimal>,
    pub pb_ratio: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub debt_to_equity: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// Current fundamentals as reported by the provider
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsUpdate {
    pub pe_ratio: Option<Decimal>,
    pub pb_ratio: Option<Decimal>,
    pub dividend_yield: Option<Decimal>,
    pub market_cap: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub revenue: Option<Decimal>,
    pub profit_margin: Option<Decimal>,
    pub debt_to_equity: Option<Decimal>,
}

/// Database model for metric snapshots
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::asset_metrics)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetMetricSnapshotDB {
    pub id: String,
    pub asset_id: String,
    pub date: NaiveDate,
    pub pe_ratio: Option<String>,
    pub pb_ratio: Option<String>,
    pub dividend_yield: Option<String>,
    pub market_cap: Option<String>,
    pub eps: Option<String>,
    pub revenue: Option<String>,
    pub profit_margin: Option<String>,
    pub debt_to_equity: Option<String>,
    pub created_at: NaiveDateTime,
}

impl AssetMetricSnapshotDB {
    pub fn from_update(asset_id: &str, date: NaiveDate, update: FundamentalsUpdate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            date,
            pe_ratio: update.pe_ratio.map(|d| d.to_string()),
            pb_ratio: update.pb_ratio.map(|d| d.to_string()),
            dividend_yield: update.dividend_yield.map(|d| d.to_string()),
            market_cap: update.market_cap.map(|d| d.to_string()),
            eps: update.eps.map(|d| d.to_string()),
            revenue: update.revenue.map(|d| d.to_string()),
            profit_margin: update.profit_margin.map(|d| d.to_string()),
            debt_to_equity: update.debt_to_equity.map(|d| d.to_string()),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl From<AssetMetricSnapshotDB> for AssetMetricSnapshot {
    fn from(db: AssetMetricSnapshotDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            date: db.date,
            pe_ratio: parse_optional_decimal(db.pe_ratio.as_deref()),
            pb_ratio: parse_optional_decimal(db.pb_ratio.as_deref()),
            dividend_yield: parse_optional_decimal(db.dividend_yield.as_deref()),
            market_cap: parse_optional_decimal(db.market_cap.as_deref()),
            eps: parse_optional_decimal(db.eps.as_deref()),
            revenue: parse_optional_decimal(db.revenue.as_deref()),
            profit_margin: parse_optional_decimal(db.profit_margin.as_deref()),
            debt_to_equity: parse_optional_decimal(db.debt_to_equity.as_deref()),
            created_at: db.created_at.and_utc(),
        }
    }
}

/// A dividend paid by an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendEvent {
    pub id: String,
    pub asset_id: String,
    pub ex_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A provider-supplied dividend before it is attached to an asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DividendUpdate {
    pub ex_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: Decimal,
}

/// Database model for dividend events
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::dividends)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DividendEventDB {
    pub id: String,
    pub asset_id: String,
    pub ex_date: NaiveDate,
    pub payment_date: Option<NaiveDate>,
    pub amount: String,
    pub created_at: NaiveDateTime,
}

impl DividendEventDB {
    pub fn from_update(asset_id: &str, update: DividendUpdate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            asset_id: asset_id.to_string(),
            ex_date: update.ex_date,
            payment_date: update.payment_date,
            amount: update.amount.to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl From<DividendEventDB> for DividendEvent {
    fn from(db: DividendEventDB) -> Self {
        Self {
            id: db.id,
            asset_id: db.asset_id,
            ex_date: db.ex_date,
            payment_date: db.payment_date,
            amount: parse_decimal(&db.amount),
            created_at: db.created_at.and_utc(),
        }
    }
}

/// Outcome of a successful synchronization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub asset_id: String,
    pub ticker: String,
    pub asset_created: bool,
    pub price_count: usize,
    pub dividend_count: usize,
}

/// Summary model for ticker search results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSearchResult {
    pub symbol: String,
    pub short_name: String,
    pub long_name: String,
    pub exchange: String,
    pub quote_type: String,
    pub type_display: String,
    pub score: f64,
}

fn parse_decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

fn parse_optional_decimal(value: Option<&str>) -> Option<Decimal> {
    value.and_then(|s| Decimal::from_str(s).ok())
}
