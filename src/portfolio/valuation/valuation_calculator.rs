use std::collections::HashMap;

use rust_decimal::Decimal;

use super::valuation_model::{AssetSummary, PortfolioValuation};
use crate::assets::Asset;
use crate::constants::DECIMAL_PRECISION;
use crate::portfolio::holdings::Holding;
use crate::transactions::{Transaction, TransactionType};

/// Assembles a portfolio valuation from pre-resolved inputs.
///
/// Lifetime buy cost and sell proceeds are taken over the whole ledger, so
/// divested assets still move `total_profit` even though they are dropped
/// from the per-asset summaries. An unresolvable price contributes zero
/// value rather than failing the valuation.
pub fn build_valuation(
    portfolio_id: &str,
    holdings: &HashMap<String, Holding>,
    assets: &HashMap<String, Asset>,
    prices: &HashMap<String, Option<Decimal>>,
    transactions: &[Transaction],
) -> PortfolioValuation {
    let mut total_buy_cost = Decimal::ZERO;
    let mut total_sell_value = Decimal::ZERO;

    for transaction in transactions {
        let gross = transaction.quantity * transaction.price;
        match transaction.transaction_type {
            TransactionType::Buy => total_buy_cost += gross,
            TransactionType::Sell => total_sell_value += gross,
        }
    }

    let mut total_value = Decimal::ZERO;
    let mut summaries = Vec::new();

    for (asset_id, holding) in holdings {
        if holding.net_quantity <= Decimal::ZERO {
            continue;
        }

        let current_price = prices.get(asset_id).copied().flatten();

        let asset_value = current_price
            .map(|price| price * holding.net_quantity)
            .unwrap_or(Decimal::ZERO);
        total_value += asset_value;

        let profit_percent = match current_price {
            Some(price) if holding.average_buy_price > Decimal::ZERO => {
                (((price / holding.average_buy_price) - Decimal::ONE) * Decimal::ONE_HUNDRED)
                    .round_dp(DECIMAL_PRECISION)
            }
            _ => Decimal::ZERO,
        };

        let (ticker, name) = assets
            .get(asset_id)
            .map(|asset| (asset.ticker.clone(), asset.name.clone()))
            .unwrap_or_else(|| (asset_id.clone(), asset_id.clone()));

        summaries.push(AssetSummary {
            asset_id: asset_id.clone(),
            ticker,
            name,
            quantity: holding.net_quantity,
            average_buy_price: holding.average_buy_price,
            current_price,
            total_value: asset_value,
            profit_percent,
        });
    }

    summaries.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    PortfolioValuation {
        portfolio_id: portfolio_id.to_string(),
        total_value,
        total_buy_cost,
        total_sell_value,
        total_profit: total_value + total_sell_value - total_buy_cost,
        assets: summaries,
    }
}
