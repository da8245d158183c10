use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::assets::AssetError;
use crate::errors::{DatabaseError, Error};
use crate::portfolio::PortfolioError;

pub type Result<T> = std::result::Result<T, TransactionError>;

/// Custom error type for ledger operations
#[derive(Debug, Error)]
pub enum TransactionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Transaction not found: {0}")]
    NotFound(String),
    #[error("Invalid transaction data: {0}")]
    InvalidData(String),
    #[error("Portfolio error: {0}")]
    PortfolioError(String),
    #[error("Asset error: {0}")]
    AssetError(String),
}

impl From<DieselError> for TransactionError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => {
                TransactionError::NotFound("Transaction not found".to_string())
            }
            _ => TransactionError::DatabaseError(err.to_string()),
        }
    }
}

impl From<DatabaseError> for TransactionError {
    fn from(err: DatabaseError) -> Self {
        TransactionError::DatabaseError(err.to_string())
    }
}

impl From<Error> for TransactionError {
    fn from(err: Error) -> Self {
        match err {
            Error::Database(db_err) => db_err.into(),
            other => TransactionError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AssetError> for TransactionError {
    fn from(err: AssetError) -> Self {
        TransactionError::AssetError(err.to_string())
    }
}

impl From<PortfolioError> for TransactionError {
    fn from(err: PortfolioError) -> Self {
        TransactionError::PortfolioError(err.to_string())
    }
}
