//! Portfolio state: cash, open positions, trade ledger, equity curve.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::position::{ClosedTrade, Position};

/// One point of the equity curve. Append-only; never revised retroactively.
#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioSnapshot {
    pub date: NaiveDate,
    pub cash: f64,
    pub equity: f64,
    pub cumulative_pnl: f64,
    pub open_positions: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    pub cash: f64,
    pub initial_capital: f64,
    pub positions: HashMap<String, Position>,
    pub closed_trades: Vec<ClosedTrade>,
    pub equity_curve: Vec<PortfolioSnapshot>,
}

impl Portfolio {
    pub fn new(initial_capital: f64) -> Self {
        Portfolio {
            cash: initial_capital,
            initial_capital,
            positions: HashMap::new(),
            closed_trades: Vec::new(),
            equity_curve: Vec::new(),
        }
    }

    pub fn add_position(&mut self, position: Position) {
        self.positions.insert(position.symbol.clone(), position);
    }

    pub fn get_position(&self, symbol: &str) -> Option<&Position> {
        self.positions.get(symbol)
    }

    pub fn has_position(&self, symbol: &str) -> bool {
        self.positions.contains_key(symbol)
    }

    pub fn remove_position(&mut self, symbol: &str) -> Option<Position> {
        self.positions.remove(symbol)
    }

    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    pub fn record_trade(&mut self, trade: ClosedTrade) {
        self.closed_trades.push(trade);
    }

    /// Sum of risk_amount committed across all open positions.
    pub fn committed_risk(&self) -> f64 {
        self.positions.values().map(|pos| pos.risk_amount).sum()
    }

    /// Realized profit and loss over the closed-trade ledger.
    pub fn realized_pnl(&self) -> f64 {
        self.closed_trades.iter().map(|trade| trade.pnl).sum()
    }

    /// Cash plus mark-to-market value of open positions.
    ///
    /// `price_map` holds the latest known close per symbol; a position whose
    /// symbol is missing from the map is valued at its entry price.
    pub fn total_equity(&self, price_map: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .values()
            .map(|pos| {
                let price = price_map
                    .get(&pos.symbol)
                    .copied()
                    .unwrap_or(pos.entry_price);
                pos.market_value(price)
            })
            .sum();
        self.cash + position_value
    }

    /// Append one equity-curve point for `date` and return it.
    pub fn record_snapshot(
        &mut self,
        date: NaiveDate,
        price_map: &HashMap<String, f64>,
    ) -> PortfolioSnapshot {
        let snapshot = PortfolioSnapshot {
            date,
            cash: self.cash,
            equity: self.total_equity(price_map),
            cumulative_pnl: self.realized_pnl(),
            open_positions: self.position_count(),
        };
        self.equity_curve.push(snapshot.clone());
        snapshot
    }
}
