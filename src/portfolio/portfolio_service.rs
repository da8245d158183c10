use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use super::holdings::aggregate_holdings;
use super::portfolio_errors::Result;
use super::portfolio_model::{NewPortfolio, Portfolio, UpdatePortfolio};
use super::portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use super::valuation::{build_valuation, PortfolioValuation};
use crate::assets::assets_traits::AssetRepositoryTrait;
use crate::market_data::MarketDataServiceTrait;
use crate::transactions::TransactionRepositoryTrait;

/// Service for portfolio management and valuation
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    asset_repository: Arc<dyn AssetRepositoryTrait>,
    market_data_service: Arc<dyn MarketDataServiceTrait>,
}

impl PortfolioService {
    pub fn new(
        repository: Arc<dyn PortfolioRepositoryTrait>,
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        asset_repository: Arc<dyn AssetRepositoryTrait>,
        market_data_service: Arc<dyn MarketDataServiceTrait>,
    ) -> Self {
        Self {
            repository,
            transaction_repository,
            asset_repository,
            market_data_service,
        }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        self.repository.create(new_portfolio)
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)
    }

    fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.repository.list()
    }

    fn update_portfolio(&self, update_portfolio: UpdatePortfolio) -> Result<Portfolio> {
        self.repository.update(update_portfolio)
    }

    fn delete_portfolio(&self, portfolio_id: &str) -> Result<()> {
        self.repository.delete(portfolio_id)
    }

    async fn get_valuation(&self, portfolio_id: &str) -> Result<PortfolioValuation> {
        let portfolio = self.repository.get_by_id(portfolio_id)?;
        let transactions = self
            .transaction_repository
            .list_by_portfolio(&portfolio.id)?;

        let holdings = aggregate_holdings(&transactions);
        debug!(
            "Valuing portfolio {} with {} ledger entries across {} assets",
            portfolio.id,
            transactions.len(),
            holdings.len()
        );

        // Prices are only resolved for live positions; divested assets
        // enter the valuation through the ledger totals alone
        let mut assets = HashMap::new();
        let mut prices = HashMap::new();
        for (asset_id, holding) in &holdings {
            if holding.net_quantity <= Decimal::ZERO {
                continue;
            }

            let asset = self.asset_repository.get_by_id(asset_id)?;
            let price = self.market_data_service.get_current_price(&asset).await?;

            prices.insert(asset_id.clone(), price);
            assets.insert(asset_id.clone(), asset);
        }

        Ok(build_valuation(
            &portfolio.id,
            &holdings,
            &assets,
            &prices,
            &transactions,
        ))
    }
}
