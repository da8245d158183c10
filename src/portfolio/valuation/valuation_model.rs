use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Read model for one held asset inside a portfolio valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub asset_id: String,
    pub ticker: String,
    pub name: String,
    pub quantity: Decimal,
    pub average_buy_price: Decimal,
    /// `None` when no price could be resolved at all, which is distinct
    /// from a price of zero.
    pub current_price: Option<Decimal>,
    pub total_value: Decimal,
    pub profit_percent: Decimal,
}

/// Read model for a whole portfolio valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    pub portfolio_id: String,
    pub total_value: Decimal,
    pub total_buy_cost: Decimal,
    pub total_sell_value: Decimal,
    pub total_profit: Decimal,
    pub assets: Vec<AssetSummary>,
}
