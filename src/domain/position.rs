//! Open position and closed trade records.

use chrono::NaiveDate;

/// An open long position. Owned exclusively by the risk manager; at most one
/// per symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub symbol: String,
    pub quantity: i64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub entry_rsi: f64,
    /// Capital committed against the risk budget at entry time.
    pub risk_amount: f64,
}

impl Position {
    pub fn market_value(&self, price: f64) -> f64 {
        self.quantity as f64 * price
    }
}

/// Immutable record of a completed BUY -> SELL round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub symbol: String,
    pub quantity: i64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub pnl: f64,
    pub rsi_at_entry: f64,
}
