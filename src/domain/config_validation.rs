//! Start-up validation of backtest parameters.
//!
//! Every check here is fatal: an invalid configuration aborts before any
//! data is fetched.

use super::backtest::BacktestConfig;
use super::error::RsitraderError;

fn invalid(key: &str, reason: &str) -> RsitraderError {
    RsitraderError::ConfigInvalid {
        section: "backtest".into(),
        key: key.into(),
        reason: reason.into(),
    }
}

pub fn validate_config(config: &BacktestConfig) -> Result<(), RsitraderError> {
    if !(config.initial_capital > 0.0) {
        return Err(invalid("initial_capital", "must be positive"));
    }
    if !(config.risk_fraction > 0.0 && config.risk_fraction <= 1.0) {
        return Err(invalid("risk_fraction", "must be in (0, 1]"));
    }
    if config.window_days <= 0 {
        return Err(invalid("window_days", "must be positive"));
    }
    if config.indicators.rsi_period == 0 {
        return Err(invalid("rsi_period", "must be positive"));
    }
    if config.indicators.sma_short == 0 {
        return Err(invalid("sma_short", "must be positive"));
    }
    if config.indicators.sma_long <= config.indicators.sma_short {
        return Err(invalid("sma_long", "must exceed sma_short"));
    }
    if !(config.thresholds.oversold > 0.0
        && config.thresholds.oversold < config.thresholds.overbought
        && config.thresholds.overbought < 100.0)
    {
        return Err(invalid(
            "rsi_oversold/rsi_overbought",
            "need 0 < oversold < overbought < 100",
        ));
    }
    Ok(())
}

/// Fewest bars a symbol needs before the rule can ever fire: the longest
/// SMA warmup plus the bar that completes it.
pub fn minimum_bars(config: &BacktestConfig) -> usize {
    config
        .indicators
        .sma_long
        .max(config.indicators.rsi_period + 1)
}
