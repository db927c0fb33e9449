//! Signal generation: RSI + SMA crossover entry/exit rules.
//!
//! Per-symbol state machine:
//! - Flat    -> Buy  when RSI < oversold AND SMA(short) > SMA(long),
//!              and only when every indicator has warmed up.
//! - Holding -> Sell when RSI > overbought OR SMA(short) < SMA(long).
//! - otherwise Hold.
//!
//! An open position is never re-entered. A bar's signal depends only on
//! data up to and including that bar; given the same indicator sequence the
//! output is identical on every run.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::indicator::IndicatorSnapshot;

/// Whether a position is currently open for a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Holding,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
            SignalKind::Hold => write!(f, "HOLD"),
        }
    }
}

/// RSI entry/exit thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalThresholds {
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            oversold: 35.0,
            overbought: 65.0,
        }
    }
}

/// One signal per bar per symbol; produced once and never retracted.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub date: NaiveDate,
    pub symbol: String,
    pub kind: SignalKind,
    pub price: f64,
    pub rsi: Option<f64>,
    pub confidence: f64,
    pub prediction: Option<f64>,
}

/// Decide the signal kind for the latest snapshot.
pub fn evaluate(
    snapshot: &IndicatorSnapshot,
    state: PositionState,
    thresholds: &SignalThresholds,
) -> SignalKind {
    match state {
        PositionState::Flat => {
            let (Some(rsi), Some(short), Some(long)) =
                (snapshot.rsi, snapshot.sma_short, snapshot.sma_long)
            else {
                return SignalKind::Hold;
            };
            if rsi < thresholds.oversold && short > long {
                SignalKind::Buy
            } else {
                SignalKind::Hold
            }
        }
        PositionState::Holding => {
            // Exit conditions may fire on partial warmup; a missing SMA
            // never forces an exit on its own.
            let rsi_exit = snapshot.rsi.is_some_and(|rsi| rsi > thresholds.overbought);
            let cross_exit = match (snapshot.sma_short, snapshot.sma_long) {
                (Some(short), Some(long)) => short < long,
                _ => false,
            };
            if rsi_exit || cross_exit {
                SignalKind::Sell
            } else {
                SignalKind::Hold
            }
        }
    }
}

/// Build the full signal record for a bar.
pub fn generate_signal(
    symbol: &str,
    snapshot: &IndicatorSnapshot,
    state: PositionState,
    thresholds: &SignalThresholds,
) -> Signal {
    let kind = evaluate(snapshot, state, thresholds);
    Signal {
        date: snapshot.date,
        symbol: symbol.to_string(),
        kind,
        price: snapshot.close,
        rsi: snapshot.rsi,
        confidence: confidence(kind, snapshot.rsi, thresholds),
        prediction: None,
    }
}

/// How far RSI sits beyond the triggering threshold, scaled to [0, 1].
fn confidence(kind: SignalKind, rsi: Option<f64>, thresholds: &SignalThresholds) -> f64 {
    let Some(rsi) = rsi else { return 0.0 };
    match kind {
        SignalKind::Buy => ((thresholds.oversold - rsi) / thresholds.oversold).clamp(0.0, 1.0),
        SignalKind::Sell => {
            ((rsi - thresholds.overbought) / (100.0 - thresholds.overbought)).clamp(0.0, 1.0)
        }
        SignalKind::Hold => 0.0,
    }
}
