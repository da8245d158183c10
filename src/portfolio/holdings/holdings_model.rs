use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net position in one asset, derived from the transaction ledger.
/// `net_quantity` can be zero or negative after oversells; callers decide
/// whether such positions count as held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub asset_id: String,
    pub net_quantity: Decimal,
    pub average_buy_price: Decimal,
}
