use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::portfolio_errors::{PortfolioError, Result};
use crate::schema::portfolios;

/// Domain model representing a portfolio (grouping of ledger entries)
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
)]
#[diesel(table_name = portfolios)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new portfolio
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolio {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}

impl NewPortfolio {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PortfolioError::InvalidInput(
                "Portfolio name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input model for updating an existing portfolio. `None` fields are left
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePortfolio {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdatePortfolio {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(PortfolioError::InvalidInput(
                "Portfolio ID is required for updates".to_string(),
            ));
        }
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(PortfolioError::InvalidInput(
                    "Portfolio name cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
