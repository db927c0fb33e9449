//! Position sizing and trade execution under the risk budget.
//!
//! Sizing rule: risk_amount = risk_fraction * current equity, quantity =
//! floor(risk_amount / entry_price). A quantity of zero is a skipped entry,
//! not an error; insufficient cash likewise downgrades to a skip. State
//! errors (a buy while holding, a sell with nothing open) are reported to
//! the caller, which logs and ignores them.

use chrono::NaiveDate;

use super::portfolio::Portfolio;
use super::position::{ClosedTrade, Position};

/// Outcome of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    Entered { quantity: i64, cost: f64 },
    /// Sized quantity was zero or cash could not cover the cost.
    SkippedInsufficientCapital,
    /// A position is already open for the symbol; never pyramid.
    SkippedAlreadyHolding,
}

/// Attempt to open a position on a buy signal.
///
/// `equity` is the portfolio's current total capital (cash plus
/// mark-to-market of open positions), computed by the caller against the
/// shared capital pool so that commitments across symbols stay serialized.
pub fn enter_position(
    portfolio: &mut Portfolio,
    symbol: &str,
    price: f64,
    date: NaiveDate,
    rsi: f64,
    risk_fraction: f64,
    equity: f64,
) -> EntryOutcome {
    if portfolio.has_position(symbol) {
        return EntryOutcome::SkippedAlreadyHolding;
    }

    let risk_amount = risk_fraction * equity;
    let quantity = (risk_amount / price).floor() as i64;
    if quantity <= 0 {
        return EntryOutcome::SkippedInsufficientCapital;
    }

    let cost = quantity as f64 * price;
    if cost > portfolio.cash {
        return EntryOutcome::SkippedInsufficientCapital;
    }

    portfolio.cash -= cost;
    portfolio.add_position(Position {
        symbol: symbol.to_string(),
        quantity,
        entry_price: price,
        entry_date: date,
        entry_rsi: rsi,
        risk_amount,
    });

    EntryOutcome::Entered { quantity, cost }
}

/// Close an open position on a sell signal.
///
/// Returns `None` when no position exists for the symbol (a state
/// inconsistency the caller logs, never fatal).
pub fn exit_position(
    portfolio: &mut Portfolio,
    symbol: &str,
    price: f64,
    date: NaiveDate,
) -> Option<ClosedTrade> {
    let position = portfolio.remove_position(symbol)?;

    let pnl = (price - position.entry_price) * position.quantity as f64;
    portfolio.cash += position.quantity as f64 * price;

    let trade = ClosedTrade {
        symbol: position.symbol,
        quantity: position.quantity,
        entry_price: position.entry_price,
        exit_price: price,
        entry_date: position.entry_date,
        exit_date: date,
        pnl,
        rsi_at_entry: position.entry_rsi,
    };
    portfolio.record_trade(trade.clone());
    Some(trade)
}
