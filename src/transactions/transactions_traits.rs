use async_trait::async_trait;

use super::transactions_errors::Result;
use super::transactions_model::{NewTransaction, Transaction};

pub trait TransactionRepositoryTrait: Send + Sync {
    fn create(&self, new_transaction: &NewTransaction, asset_id: &str) -> Result<Transaction>;
    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction>;
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    fn delete(&self, transaction_id: &str) -> Result<()>;
    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize>;
}

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Validates and records a ledger entry, creating the asset on first
    /// sight of its ticker.
    async fn add_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    fn get_transactions(&self, portfolio_id: &str) -> Result<Vec<Transaction>>;
    fn delete_transaction(&self, transaction_id: &str) -> Result<()>;
}
