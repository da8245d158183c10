pub(crate) mod portfolio_errors;
pub(crate) mod portfolio_model;
pub(crate) mod portfolio_repository;
pub(crate) mod portfolio_service;
pub(crate) mod portfolio_traits;

pub mod holdings;
pub mod valuation;

pub use portfolio_errors::PortfolioError;
pub use portfolio_model::{NewPortfolio, Portfolio, UpdatePortfolio};
pub use portfolio_repository::PortfolioRepository;
pub use portfolio_service::PortfolioService;
pub use portfolio_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};

pub use holdings::{aggregate_holdings, Holding};
pub use valuation::{build_valuation, AssetSummary, PortfolioValuation};
