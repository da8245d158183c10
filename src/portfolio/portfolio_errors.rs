use diesel::result::Error as DieselError;
use thiserror::Error;

use crate::assets::AssetError;
use crate::errors::{DatabaseError, Error};
use crate::market_data::MarketDataError;

pub type Result<T> = std::result::Result<T, PortfolioError>;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Portfolio not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Dependency error: {service}: {message}")]
    DependencyError { service: String, message: String },
}

impl PortfolioError {
    pub fn dependency(service: &str, message: impl Into<String>) -> Self {
        PortfolioError::DependencyError {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

impl From<DieselError> for PortfolioError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => PortfolioError::NotFound("Portfolio not found".to_string()),
            _ => PortfolioError::DatabaseError(err.to_string()),
        }
    }
}

impl From<DatabaseError> for PortfolioError {
    fn from(err: DatabaseError) -> Self {
        PortfolioError::DatabaseError(err.to_string())
    }
}

impl From<Error> for PortfolioError {
    fn from(err: Error) -> Self {
        match err {
            Error::Database(db_err) => db_err.into(),
            other => PortfolioError::DatabaseError(other.to_string()),
        }
    }
}

impl From<AssetError> for PortfolioError {
    fn from(err: AssetError) -> Self {
        PortfolioError::dependency("assets", err.to_string())
    }
}

impl From<MarketDataError> for PortfolioError {
    fn from(err: MarketDataError) -> Self {
        PortfolioError::dependency("market_data", err.to_string())
    }
}

impl From<crate::transactions::TransactionError> for PortfolioError {
    fn from(err: crate::transactions::TransactionError) -> Self {
        PortfolioError::dependency("transactions", err.to_string())
    }
}
