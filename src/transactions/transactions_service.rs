use log::debug;
use std::sync::Arc;

use super::transactions_errors::Result;
use super::transactions_model::{NewTransaction, Transaction};
use super::transactions_traits::{TransactionRepositoryTrait, TransactionServiceTrait};
use crate::assets::AssetServiceTrait;
use crate::portfolio::PortfolioRepositoryTrait;

/// Service for managing the transaction ledger
pub struct TransactionService {
    repository: Arc<dyn TransactionRepositoryTrait>,
    portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
    asset_service: Arc<dyn AssetServiceTrait>,
}

impl TransactionService {
    pub fn new(
        repository: Arc<dyn TransactionRepositoryTrait>,
        portfolio_repository: Arc<dyn PortfolioRepositoryTrait>,
        asset_service: Arc<dyn AssetServiceTrait>,
    ) -> Self {
        Self {
            repository,
            portfolio_repository,
            asset_service,
        }
    }
}

#[async_trait::async_trait]
impl TransactionServiceTrait for TransactionService {
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        new_transaction.validate()?;

        self.portfolio_repository
            .get_by_id(&new_transaction.portfolio_id)?;

        let asset = self
            .asset_service
            .get_or_create_asset(&new_transaction.ticker)
            .await?;

        debug!(
            "Recording {} of {} x {} in portfolio {}",
            new_transaction.transaction_type,
            new_transaction.quantity,
            asset.ticker,
            new_transaction.portfolio_id
        );

        self.repository.create(&new_transaction, &asset.id)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        self.repository.get_by_id(transaction_id)
    }

    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    fn delete_transaction(&self, transaction_id: &str) -> Result<()> {
        self.repository.delete(transaction_id)
    }
}
