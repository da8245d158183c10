use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::assets::assets_model::AssetType;

/// Provider-reported identity and classification for a ticker
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub ticker: String,
    pub name: Option<String>,
    pub asset_type: AssetType,
    pub currency: Option<String>,
    pub exchange: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
}

// Wire format of the Yahoo quoteSummary endpoint. Only the modules we
// request are modeled; unknown keys are ignored or collected.

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooResult {
    pub quote_summary: QuoteSummary,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummary {
    pub result: Vec<QuoteSummaryResult>,
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSummaryResult {
    pub price: Option<Price>,
    pub summary_profile: Option<SummaryProfile>,
    pub summary_detail: Option<SummaryDetail>,
    pub default_key_statistics: Option<DefaultKeyStatistics>,
    pub financial_data: Option<FinancialData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub regular_market_price: Option<PriceDetail>,
    pub exchange: Option<String>,
    pub exchange_name: Option<String>,
    pub quote_type: String,
    pub symbol: String,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub currency: Option<String>,

    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDetail {
    pub raw: Option<f64>,
    pub fmt: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryProfile {
    pub sector: Option<String>,
    pub industry: Option<String>,

    #[serde(flatten)]
    pub other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<PriceDetail>,
    pub dividend_yield: Option<PriceDetail>,
    pub market_cap: Option<PriceDetail>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DefaultKeyStatistics {
    pub price_to_book: Option<PriceDetail>,
    pub trailing_eps: Option<PriceDetail>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    pub total_revenue: Option<PriceDetail>,
    pub profit_margins: Option<PriceDetail>,
    pub debt_to_equity: Option<PriceDetail>,
}
