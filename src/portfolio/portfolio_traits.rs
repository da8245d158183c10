use async_trait::async_trait;

use super::portfolio_errors::Result;
use super::portfolio_model::{NewPortfolio, Portfolio, UpdatePortfolio};
use super::valuation::PortfolioValuation;

pub trait PortfolioRepositoryTrait: Send + Sync {
    fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;
    fn list(&self) -> Result<Vec<Portfolio>>;
    fn update(&self, update_portfolio: UpdatePortfolio) -> Result<Portfolio>;
    /// Deletes the portfolio together with its ledger entries.
    fn delete(&self, portfolio_id: &str) -> Result<()>;
}

#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;
    fn get_portfolios(&self) -> Result<Vec<Portfolio>>;
    fn update_portfolio(&self, update_portfolio: UpdatePortfolio) -> Result<Portfolio>;
    fn delete_portfolio(&self, portfolio_id: &str) -> Result<()>;
    /// Values the portfolio against current prices, falling back to stored
    /// closes where no live quote is available.
    async fn get_valuation(&self, portfolio_id: &str) -> Result<PortfolioValuation>;
}
