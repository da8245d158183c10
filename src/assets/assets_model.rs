use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::market_data::market_data_model::{AssetMetricSnapshot, DividendEvent};
use crate::market_data::providers::models::AssetProfile;

use super::assets_errors::{AssetError, Result};

/// Asset category, as coarse as the valuation logic needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AssetType {
    #[default]
    Stock,
    Bond,
    Etf,
    Other,
}

impl AssetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Stock => "stock",
            AssetType::Bond => "bond",
            AssetType::Etf => "etf",
            AssetType::Other => "other",
        }
    }
}

impl From<&str> for AssetType {
    fn from(value: &str) -> Self {
        match value {
            "stock" => AssetType::Stock,
            "bond" => AssetType::Bond,
            "etf" => AssetType::Etf,
            _ => AssetType::Other,
        }
    }
}

/// Domain model representing a tracked asset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub asset_type: AssetType,
    pub currency: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input model for creating a new asset
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NewAsset {
    pub id: Option<String>,
    pub ticker: String,
    pub name: String,
    pub asset_type: AssetType,
    pub currency: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

impl NewAsset {
    /// Validates the new asset data
    pub fn validate(&self) -> Result<()> {
        if self.ticker.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Asset ticker cannot be empty".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(AssetError::InvalidData(
                "Currency cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl From<AssetProfile> for NewAsset {
    fn from(profile: AssetProfile) -> Self {
        Self {
            id: None,
            name: profile.name.unwrap_or_else(|| profile.ticker.clone()),
            ticker: profile.ticker,
            asset_type: profile.asset_type,
            currency: profile.currency.unwrap_or_else(|| "USD".to_string()),
            exchange: profile.exchange,
            sector: profile.sector,
            industry: profile.industry,
        }
    }
}

/// Database model for assets
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::assets)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AssetDB {
    pub id: String,
    pub ticker: String,
    pub name: String,
    pub asset_type: String,
    pub currency: String,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<AssetDB> for Asset {
    fn from(db: AssetDB) -> Self {
        Self {
            id: db.id,
            ticker: db.ticker,
            name: db.name,
            asset_type: AssetType::from(db.asset_type.as_str()),
            currency: db.currency,
            exchange: db.exchange,
            sector: db.sector,
            industry: db.industry,
            created_at: db.created_at.and_utc(),
            updated_at: db.updated_at.and_utc(),
        }
    }
}

impl From<NewAsset> for AssetDB {
    fn from(domain: NewAsset) -> Self {
        let now = Utc::now().naive_utc();
        Self {
            id: domain
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            ticker: domain.ticker,
            name: domain.name,
            asset_type: domain.asset_type.as_str().to_string(),
            currency: domain.currency,
            exchange: domain.exchange,
            sector: domain.sector,
            industry: domain.industry,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Read model combining an asset with its market data
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetDetail {
    pub asset: Asset,
    pub current_price: Option<Decimal>,
    pub metrics: Option<AssetMetricSnapshot>,
    pub dividends: Vec<DividendEvent>,
}
