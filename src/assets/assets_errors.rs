use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

use crate::errors::{DatabaseError, Error};
use crate::market_data::MarketDataError;

/// Custom error type for asset-related operations
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Market data error: {0}")]
    MarketDataError(String),
}

impl From<DieselError> for AssetError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => AssetError::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                AssetError::AlreadyExists(info.message().to_string())
            }
            _ => AssetError::DatabaseError(err.to_string()),
        }
    }
}

impl From<DatabaseError> for AssetError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::QueryFailed(e) => AssetError::from(e),
            other => AssetError::DatabaseError(other.to_string()),
        }
    }
}

impl From<Error> for AssetError {
    fn from(err: Error) -> Self {
        match err {
            Error::Database(e) => e.into(),
            other => AssetError::DatabaseError(other.to_string()),
        }
    }
}

impl From<MarketDataError> for AssetError {
    fn from(err: MarketDataError) -> Self {
        AssetError::MarketDataError(err.to_string())
    }
}

/// Result type for asset operations
pub type Result<T> = std::result::Result<T, AssetError>;
