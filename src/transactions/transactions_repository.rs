use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;

use super::transactions_errors::{Result, TransactionError};
use super::transactions_model::{NewTransaction, Transaction, TransactionDB};
use super::transactions_traits::TransactionRepositoryTrait;
use crate::db::get_connection;
use crate::schema::transactions;

pub struct TransactionRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TransactionRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl TransactionRepositoryTrait for TransactionRepository {
    fn create(&self, new_transaction: &NewTransaction, asset_id: &str) -> Result<Transaction> {
        new_transaction.validate()?;
        let transaction_date = new_transaction.parsed_date()?;

        let mut conn = get_connection(&self.pool)?;

        let transaction_db = TransactionDB::from_new(new_transaction, asset_id, transaction_date);

        diesel::insert_into(transactions::table)
            .values(&transaction_db)
            .get_result::<TransactionDB>(&mut conn)
            .map(Transaction::from)
            .map_err(TransactionError::from)
    }

    fn get_by_id(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .find(transaction_id)
            .first::<TransactionDB>(&mut conn)
            .map(Transaction::from)
            .map_err(TransactionError::from)
    }

    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;

        transactions::table
            .filter(transactions::portfolio_id.eq(portfolio_id))
            .order(transactions::transaction_date.desc())
            .load::<TransactionDB>(&mut conn)
            .map(|rows| rows.into_iter().map(Transaction::from).collect())
            .map_err(TransactionError::from)
    }

    fn delete(&self, transaction_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        let deleted =
            diesel::delete(transactions::table.filter(transactions::id.eq(transaction_id)))
                .execute(&mut conn)
                .map_err(TransactionError::from)?;

        if deleted == 0 {
            return Err(TransactionError::NotFound(transaction_id.to_string()));
        }

        Ok(())
    }

    fn delete_by_portfolio(&self, portfolio_id: &str) -> Result<usize> {
        let mut conn = get_connection(&self.pool)?;

        diesel::delete(transactions::table.filter(transactions::portfolio_id.eq(portfolio_id)))
            .execute(&mut conn)
            .map_err(TransactionError::from)
    }
}
