pub mod db;

pub mod assets;
pub mod constants;
pub mod errors;
pub mod market_data;
pub mod portfolio;
pub mod schema;
pub mod transactions;

pub use errors::{Error, Result};
