//! Technical indicator calculations.
//!
//! Each indicator is a pure function of one symbol's bar sequence; no state
//! is carried between symbols. Warmup bars are `None`, never a default value,
//! so insufficient history can never produce a false signal.

pub mod rsi;
pub mod sma;

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;

use rsi::calculate_rsi;
use sma::calculate_sma;

/// Indicator periods for the strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub rsi_period: usize,
    pub sma_short: usize,
    pub sma_long: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            rsi_period: 14,
            sma_short: 20,
            sma_long: 50,
        }
    }
}

/// Per-bar derived values. A `None` means the indicator has not warmed up.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub date: NaiveDate,
    pub close: f64,
    pub rsi: Option<f64>,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
}

impl IndicatorSnapshot {
    /// True once every indicator has enough history.
    pub fn all_available(&self) -> bool {
        self.rsi.is_some() && self.sma_short.is_some() && self.sma_long.is_some()
    }
}

/// Compute a snapshot for every bar in the sequence.
pub fn compute_snapshots(bars: &[OhlcvBar], params: &IndicatorParams) -> Vec<IndicatorSnapshot> {
    let rsi = calculate_rsi(bars, params.rsi_period);
    let short = calculate_sma(bars, params.sma_short);
    let long = calculate_sma(bars, params.sma_long);

    bars.iter()
        .enumerate()
        .map(|(i, bar)| IndicatorSnapshot {
            date: bar.date,
            close: bar.close,
            rsi: rsi[i],
            sma_short: short[i],
            sma_long: long[i],
        })
        .collect()
}
