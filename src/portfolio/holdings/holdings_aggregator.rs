use std::collections::HashMap;

use rust_decimal::Decimal;

use super::holdings_model::Holding;
use crate::constants::DECIMAL_PRECISION;
use crate::transactions::{Transaction, TransactionType};

#[derive(Default)]
struct PositionAccumulator {
    net_quantity: Decimal,
    buy_quantity: Decimal,
    buy_cost: Decimal,
}

/// Collapses a transaction ledger into one net position per asset.
///
/// Pure function over the given slice. Sells reduce the net quantity but
/// never the cost basis, so `average_buy_price` reflects lifetime buys
/// only and is zero when nothing was ever bought.
pub fn aggregate_holdings(transactions: &[Transaction]) -> HashMap<String, Holding> {
    let mut groups: HashMap<String, PositionAccumulator> = HashMap::new();

    for transaction in transactions {
        let entry = groups.entry(transaction.asset_id.clone()).or_default();

        match transaction.transaction_type {
            TransactionType::Buy => {
                entry.net_quantity += transaction.quantity;
                entry.buy_quantity += transaction.quantity;
                entry.buy_cost += transaction.quantity * transaction.price;
            }
            TransactionType::Sell => {
                entry.net_quantity -= transaction.quantity;
            }
        }
    }

    groups
        .into_iter()
        .map(|(asset_id, position)| {
            let average_buy_price = if position.buy_quantity > Decimal::ZERO {
                (position.buy_cost / position.buy_quantity).round_dp(DECIMAL_PRECISION)
            } else {
                Decimal::ZERO
            };

            (
                asset_id.clone(),
                Holding {
                    asset_id,
                    net_quantity: position.net_quantity,
                    average_buy_price,
                },
            )
        })
        .collect()
}
