//! Performance statistics over the trade ledger and equity curve.
//!
//! Always a fresh computation from the full ledger and curve, never an
//! incremental update, so a report can never go stale.

use super::portfolio::{Portfolio, PortfolioSnapshot};

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport {
    pub total_return: f64,
    pub annualized_return: f64,
    /// None when fewer than two equity points or zero return deviation.
    pub sharpe_ratio: Option<f64>,
    /// Maximum peak-to-trough decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// None when no trades closed.
    pub win_rate: Option<f64>,
    pub total_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub avg_win: f64,
    pub avg_loss: f64,
}

impl PerformanceReport {
    pub fn compute(portfolio: &Portfolio) -> Self {
        let curve = &portfolio.equity_curve;
        let trades = &portfolio.closed_trades;
        let initial_capital = portfolio.initial_capital;

        let final_equity = curve.last().map(|p| p.equity).unwrap_or(initial_capital);
        let total_return = if initial_capital > 0.0 {
            (final_equity - initial_capital) / initial_capital
        } else {
            0.0
        };

        let trading_days = curve.len() as f64;
        let years = trading_days / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let sharpe_ratio = compute_sharpe(curve);
        let max_drawdown = compute_drawdown(curve);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;

        for trade in trades {
            if trade.pnl > 0.0 {
                trades_won += 1;
                total_wins += trade.pnl;
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                total_losses += trade.pnl.abs();
            } else {
                trades_breakeven += 1;
            }
        }

        let total_trades = trades.len();
        let win_rate = if total_trades > 0 {
            Some(trades_won as f64 / total_trades as f64)
        } else {
            None
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        PerformanceReport {
            total_return,
            annualized_return,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            total_trades,
            trades_won,
            trades_lost,
            trades_breakeven,
            avg_win,
            avg_loss,
        }
    }
}

fn compute_drawdown(curve: &[PortfolioSnapshot]) -> f64 {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;

    for point in curve {
        if point.equity > peak {
            peak = point.equity;
        } else if peak > 0.0 {
            let dd = (peak - point.equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// Mean over population standard deviation of per-bar equity returns,
/// annualized. Undefined (None) when the deviation is zero.
fn compute_sharpe(curve: &[PortfolioSnapshot]) -> Option<f64> {
    if curve.len() < 2 {
        return None;
    }

    let returns: Vec<f64> = curve
        .windows(2)
        .map(|pair| {
            let prev = pair[0].equity;
            if prev > 0.0 {
                (pair[1].equity - prev) / prev
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    if stddev > 0.0 {
        Some((mean / stddev) * TRADING_DAYS_PER_YEAR.sqrt())
    } else {
        None
    }
}
