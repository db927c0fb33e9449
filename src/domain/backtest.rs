//! Backtest orchestrator: the walk-forward event loop.
//!
//! Drives indicators, signal generation, execution and portfolio tracking
//! bar by bar over a unified cross-symbol timeline. The simulation is
//! single-threaded and deterministic: bars are processed strictly in
//! chronological order, and within a date symbols are processed in
//! alphabetical order so that commitments against the shared capital pool
//! never depend on map iteration order.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use super::error::RsitraderError;
use super::execution::{EntryOutcome, enter_position, exit_position};
use super::indicator::{IndicatorParams, IndicatorSnapshot, compute_snapshots};
use super::metrics::PerformanceReport;
use super::portfolio::Portfolio;
use super::signal::{PositionState, Signal, SignalKind, SignalThresholds, generate_signal};
use super::symbol_data::{SymbolData, build_unified_timeline, latest_common_date};
use crate::ports::notify_port::NotifyPort;
use crate::ports::prediction_port::PredictionPort;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_capital: f64,
    pub risk_fraction: f64,
    pub window_days: i64,
    pub indicators: IndicatorParams,
    pub thresholds: SignalThresholds,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        BacktestConfig {
            initial_capital: 100_000.0,
            risk_fraction: 0.02,
            window_days: 180,
            indicators: IndicatorParams::default(),
            thresholds: SignalThresholds::default(),
        }
    }
}

/// The evaluation period actually covered by the run.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub requested_days: i64,
    /// True when the data span is shorter than the requested window.
    /// Bars are never fabricated to fill the gap.
    pub truncated: bool,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub portfolio: Portfolio,
    pub report: PerformanceReport,
    pub window: EvalWindow,
    pub signals: Vec<Signal>,
}

/// Run a backtest over the trailing evaluation window.
///
/// Fires notifier events at trade close, end of each bar, and end of run;
/// every notifier call is best-effort and cannot affect the result.
pub fn run_backtest(
    symbols: &[SymbolData],
    config: &BacktestConfig,
    notifier: &dyn NotifyPort,
    predictor: Option<&dyn PredictionPort>,
) -> Result<BacktestResult, RsitraderError> {
    let end = latest_common_date(symbols).ok_or_else(|| RsitraderError::NoData {
        symbol: "all".to_string(),
    })?;

    // Window restriction happens before any indicator computation.
    let mut windowed: Vec<SymbolData> = symbols
        .iter()
        .map(|sd| sd.restrict_window(end, config.window_days))
        .filter(|sd| sd.bar_count() > 0)
        .collect();
    windowed.sort_by(|a, b| a.symbol.cmp(&b.symbol));

    if windowed.is_empty() {
        return Err(RsitraderError::NoData {
            symbol: "all".to_string(),
        });
    }

    let window = resolve_window(&windowed, end, config.window_days);

    let snapshots: Vec<Vec<IndicatorSnapshot>> = windowed
        .iter()
        .map(|sd| compute_snapshots(&sd.bars, &config.indicators))
        .collect();

    let timeline = build_unified_timeline(&windowed);
    let mut portfolio = Portfolio::new(config.initial_capital);
    let mut states: HashMap<String, PositionState> = windowed
        .iter()
        .map(|sd| (sd.symbol.clone(), PositionState::Flat))
        .collect();
    let mut last_close: HashMap<String, f64> = HashMap::new();
    let mut signals: Vec<Signal> = Vec::new();

    for &date in &timeline {
        // Mark-to-market prices first, so sizing on this bar sees the
        // same closes the end-of-bar snapshot will use.
        for sd in &windowed {
            if let Some(bar) = sd.get_bar(date) {
                last_close.insert(sd.symbol.clone(), bar.close);
            }
        }

        for (sd, symbol_snapshots) in windowed.iter().zip(&snapshots) {
            let Some(index) = sd.get_bar_index(date) else {
                continue;
            };
            let snapshot = &symbol_snapshots[index];
            let state = states[&sd.symbol];

            let mut signal = generate_signal(&sd.symbol, snapshot, state, &config.thresholds);
            if let Some(predictor) = predictor {
                signal.prediction = predictor.predict(snapshot);
            }

            match signal.kind {
                SignalKind::Buy => {
                    let equity = portfolio.total_equity(&last_close);
                    let rsi = signal.rsi.unwrap_or(0.0);
                    match enter_position(
                        &mut portfolio,
                        &sd.symbol,
                        signal.price,
                        date,
                        rsi,
                        config.risk_fraction,
                        equity,
                    ) {
                        EntryOutcome::Entered { .. } => {
                            states.insert(sd.symbol.clone(), PositionState::Holding);
                        }
                        EntryOutcome::SkippedInsufficientCapital => {}
                        EntryOutcome::SkippedAlreadyHolding => {
                            eprintln!(
                                "Warning: buy signal for {} while already holding, ignored",
                                sd.symbol
                            );
                        }
                    }
                }
                SignalKind::Sell => {
                    match exit_position(&mut portfolio, &sd.symbol, signal.price, date) {
                        Some(trade) => {
                            states.insert(sd.symbol.clone(), PositionState::Flat);
                            notifier.trade_closed(&trade);
                        }
                        None => {
                            eprintln!(
                                "Warning: sell signal for {} with no open position, ignored",
                                sd.symbol
                            );
                        }
                    }
                }
                SignalKind::Hold => {}
            }

            signals.push(signal);
        }

        let snapshot = portfolio.record_snapshot(date, &last_close);
        notifier.portfolio_snapshot(&snapshot);
    }

    let report = PerformanceReport::compute(&portfolio);
    notifier.run_completed(&report);

    Ok(BacktestResult {
        portfolio,
        report,
        window,
        signals,
    })
}

fn resolve_window(windowed: &[SymbolData], end: NaiveDate, requested_days: i64) -> EvalWindow {
    let requested_start = end - Duration::days(requested_days);
    let earliest = windowed
        .iter()
        .filter_map(|sd| sd.first_date())
        .min()
        .unwrap_or(end);
    let start = earliest.max(requested_start);

    EvalWindow {
        start,
        end,
        requested_days,
        truncated: earliest > requested_start,
    }
}
