use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use super::portfolio_errors::{PortfolioError, Result};
use super::portfolio_model::{NewPortfolio, Portfolio, UpdatePortfolio};
use super::portfolio_traits::PortfolioRepositoryTrait;
use crate::db::get_connection;
use crate::schema::{portfolios, transactions};

/// Repository for managing portfolio rows
pub struct PortfolioRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl PortfolioRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        Self { pool }
    }
}

impl PortfolioRepositoryTrait for PortfolioRepository {
    fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        new_portfolio.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let now = Utc::now().naive_utc();
        let portfolio = Portfolio {
            id: new_portfolio
                .id
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            name: new_portfolio.name,
            description: new_portfolio.description,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(portfolios::table)
            .values(&portfolio)
            .get_result::<Portfolio>(&mut conn)
            .map_err(PortfolioError::from)
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;

        portfolios::table
            .find(portfolio_id)
            .first::<Portfolio>(&mut conn)
            .map_err(PortfolioError::from)
    }

    fn list(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;

        portfolios::table
            .order(portfolios::name.asc())
            .load::<Portfolio>(&mut conn)
            .map_err(PortfolioError::from)
    }

    fn update(&self, update_portfolio: UpdatePortfolio) -> Result<Portfolio> {
        update_portfolio.validate()?;

        let mut conn = get_connection(&self.pool)?;

        let mut portfolio = portfolios::table
            .find(&update_portfolio.id)
            .first::<Portfolio>(&mut conn)
            .map_err(PortfolioError::from)?;

        if let Some(name) = update_portfolio.name {
            portfolio.name = name;
        }
        if update_portfolio.description.is_some() {
            portfolio.description = update_portfolio.description;
        }
        portfolio.updated_at = Utc::now().naive_utc();

        diesel::update(portfolios::table.find(&portfolio.id))
            .set(&portfolio)
            .get_result::<Portfolio>(&mut conn)
            .map_err(PortfolioError::from)
    }

    fn delete(&self, portfolio_id: &str) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            diesel::delete(
                transactions::table.filter(transactions::portfolio_id.eq(portfolio_id)),
            )
            .execute(conn)?;

            let deleted = diesel::delete(portfolios::table.find(portfolio_id)).execute(conn)?;
            if deleted == 0 {
                return Err(diesel::result::Error::NotFound);
            }

            Ok(())
        })
        .map_err(PortfolioError::from)
    }
}
