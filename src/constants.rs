/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Database filename used when no DATABASE_URL override is present
pub const DATABASE_FILENAME: &str = "portfolio_monitor.db";
