use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use super::transactions_errors::{Result, TransactionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    #[default]
    Buy,
    Sell,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "buy",
            TransactionType::Sell => "sell",
        }
    }
}

impl FromStr for TransactionType {
    type Err = TransactionError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "buy" => Ok(TransactionType::Buy),
            "sell" => Ok(TransactionType::Sell),
            other => Err(TransactionError::InvalidData(format!(
                "Unknown transaction type: {}",
                other
            ))),
        }
    }
}

/// Domain model representing one ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub transaction_type: TransactionType,
    pub quantity: Decimal,
    pub price: Decimal,
    pub fee: Decimal,
    pub transaction_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input model for recording a new ledger entry. The asset is addressed by
/// ticker and resolved during insertion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub id: Option<String>,
    pub portfolio_id: String,
    pub ticker: String,
    pub transaction_type: String,
    pub quantity: Decimal,
    pub price: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    pub transaction_date: String,
    pub notes: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        if self.portfolio_id.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Portfolio ID cannot be empty".to_string(),
            ));
        }
        if self.ticker.trim().is_empty() {
            return Err(TransactionError::InvalidData(
                "Ticker cannot be empty".to_string(),
            ));
        }
        TransactionType::from_str(&self.transaction_type)?;
        if self.quantity <= Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Quantity must be positive".to_string(),
            ));
        }
        if self.price < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Price cannot be negative".to_string(),
            ));
        }
        if self.fee < Decimal::ZERO {
            return Err(TransactionError::InvalidData(
                "Fee cannot be negative".to_string(),
            ));
        }
        if DateTime::parse_from_rfc3339(&self.transaction_date).is_err()
            && NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d").is_err()
        {
            return Err(TransactionError::InvalidData(
                "Invalid date format. Expected ISO 8601/RFC3339 or YYYY-MM-DD".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses the transaction date, treating a bare date as midnight UTC
    pub fn parsed_date(&self) -> Result<DateTime<Utc>> {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(&self.transaction_date) {
            return Ok(datetime.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(&self.transaction_date, "%Y-%m-%d")
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
            .map_err(|_| {
                TransactionError::InvalidData(
                    "Invalid date format. Expected ISO 8601/RFC3339 or YYYY-MM-DD".to_string(),
                )
            })
    }
}

/// Database model for ledger entries
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: String,
    pub portfolio_id: String,
    pub asset_id: String,
    pub transaction_type: String,
    pub quantity: String,
    pub price: String,
    pub fee: String,
    pub transaction_date: NaiveDateTime,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
}

impl TransactionDB {
    pub fn from_new(
        new_transaction: &NewTransaction,
        asset_id: &str,
        transaction_date: DateTime<Utc>,
    ) -> Self {
        TransactionDB {
            id: new_transaction
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            portfolio_id: new_transaction.portfolio_id.clone(),
            asset_id: asset_id.to_string(),
            transaction_type: new_transaction.transaction_type.to_lowercase(),
            quantity: new_transaction.quantity.to_string(),
            price: new_transaction.price.to_string(),
            fee: new_transaction.fee.to_string(),
            transaction_date: transaction_date.naive_utc(),
            notes: new_transaction.notes.clone(),
            created_at: Utc::now().naive_utc(),
        }
    }
}

impl From<TransactionDB> for Transaction {
    fn from(db: TransactionDB) -> Self {
        Transaction {
            id: db.id,
            portfolio_id: db.portfolio_id,
            asset_id: db.asset_id,
            transaction_type: TransactionType::from_str(&db.transaction_type)
                .unwrap_or_default(),
            quantity: parse_decimal(&db.quantity),
            price: parse_decimal(&db.price),
            fee: parse_decimal(&db.fee),
            transaction_date: db.transaction_date.and_utc(),
            notes: db.notes,
            created_at: db.created_at.and_utc(),
        }
    }
}

fn parse_decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> NewTransaction {
        NewTransaction {
            id: None,
            portfolio_id: "portfolio-1".to_string(),
            ticker: "AAPL".to_string(),
            transaction_type: "buy".to_string(),
            quantity: dec!(10),
            price: dec!(150.25),
            fee: dec!(1.5),
            transaction_date: "2024-03-15".to_string(),
            notes: None,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed_input() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        let mut tx = sample();
        tx.quantity = Decimal::ZERO;
        assert!(matches!(
            tx.validate(),
            Err(TransactionError::InvalidData(_))
        ));

        tx.quantity = dec!(-3);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_negative_price_and_fee() {
        let mut tx = sample();
        tx.price = dec!(-0.01);
        assert!(tx.validate().is_err());

        let mut tx = sample();
        tx.fee = dec!(-1);
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_type() {
        let mut tx = sample();
        tx.transaction_type = "short".to_string();
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_malformed_date() {
        let mut tx = sample();
        tx.transaction_date = "15/03/2024".to_string();
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_parsed_date_accepts_both_formats() {
        let mut tx = sample();
        assert_eq!(
            tx.parsed_date().unwrap().date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );

        tx.transaction_date = "2024-03-15T14:30:00Z".to_string();
        let parsed = tx.parsed_date().unwrap();
        assert_eq!(
            parsed.date_naive(),
            NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
        );
    }

    #[test]
    fn test_transaction_type_round_trip() {
        assert_eq!(TransactionType::from_str("BUY").unwrap(), TransactionType::Buy);
        assert_eq!(TransactionType::from_str("sell").unwrap(), TransactionType::Sell);
        assert_eq!(TransactionType::Buy.as_str(), "buy");
        assert!(TransactionType::from_str("dividend").is_err());
    }
}
