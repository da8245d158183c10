use thiserror::Error;

use crate::assets::assets_errors::AssetError;
use crate::errors::{DatabaseError, Error};
use yahoo_finance_api::YahooError;

pub type Result<T> = std::result::Result<T, MarketDataError>;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Database error: {0}")]
    DatabaseConnectionError(#[from] DatabaseError),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<YahooError> for MarketDataError {
    fn from(error: YahooError) -> Self {
        match error {
            YahooError::FetchFailed(e) => MarketDataError::ProviderError(e),
            YahooError::NoQuotes => MarketDataError::NotFound("No quotes found".to_string()),
            YahooError::NoResult => MarketDataError::NotFound("No data found".to_string()),
            _ => MarketDataError::Unknown(error.to_string()),
        }
    }
}

impl From<Error> for MarketDataError {
    fn from(err: Error) -> Self {
        match err {
            Error::Database(e) => MarketDataError::DatabaseConnectionError(e),
            other => MarketDataError::Unknown(other.to_string()),
        }
    }
}

impl From<AssetError> for MarketDataError {
    fn from(err: AssetError) -> Self {
        match err {
            AssetError::NotFound(msg) => MarketDataError::NotFound(msg),
            other => MarketDataError::Unknown(other.to_string()),
        }
    }
}
