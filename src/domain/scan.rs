//! One-shot signal scan across the universe.
//!
//! Evaluates the entry/exit rule on the most recent bar of each symbol
//! without simulating any trades. Every symbol is scanned as if flat, so
//! the output answers "would the strategy buy this today?".

use super::backtest::BacktestConfig;
use super::indicator::compute_snapshots;
use super::signal::{PositionState, Signal, generate_signal};
use super::symbol_data::SymbolData;

/// Current-bar signal plus warmup status for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub signal: Signal,
    pub warmed_up: bool,
}

/// Scan each symbol's latest bar inside the trailing window. Symbols with
/// no bars in the window are omitted; output is alphabetical by symbol.
pub fn scan_symbols(symbols: &[SymbolData], config: &BacktestConfig) -> Vec<ScanEntry> {
    let mut entries: Vec<ScanEntry> = symbols
        .iter()
        .filter_map(|sd| {
            let end = sd.last_date()?;
            let windowed = sd.restrict_window(end, config.window_days);
            let snapshots = compute_snapshots(&windowed.bars, &config.indicators);
            let snapshot = snapshots.last()?;
            Some(ScanEntry {
                signal: generate_signal(
                    &sd.symbol,
                    snapshot,
                    PositionState::Flat,
                    &config.thresholds,
                ),
                warmed_up: snapshot.all_available(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.signal.symbol.cmp(&b.signal.symbol));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::OhlcvBar;
    use crate::domain::signal::SignalKind;
    use chrono::{Duration, NaiveDate};

    fn make_symbol(symbol: &str, closes: &[f64]) -> SymbolData {
        let bars: Vec<OhlcvBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                symbol: symbol.to_string(),
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                    + Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        SymbolData::new(symbol.to_string(), bars)
    }

    /// Uptrend then a sharp drop: oversold RSI with a still-bullish cross.
    fn buy_setup_closes() -> Vec<f64> {
        let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.1).collect();
        let mut price = *closes.last().unwrap();
        for _ in 0..3 {
            price -= 3.0;
            closes.push(price);
        }
        closes
    }

    #[test]
    fn scan_flags_buy_setup() {
        let data = make_symbol("TCS.BSE", &buy_setup_closes());
        let entries = scan_symbols(&[data], &BacktestConfig::default());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].signal.kind, SignalKind::Buy);
        assert!(entries[0].warmed_up);
        assert!(entries[0].signal.rsi.unwrap() < 35.0);
    }

    #[test]
    fn scan_holds_on_quiet_series() {
        let closes: Vec<f64> = (0..60)
            .map(|i| 100.0 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let data = make_symbol("INFY.BSE", &closes);
        let entries = scan_symbols(&[data], &BacktestConfig::default());

        assert_eq!(entries[0].signal.kind, SignalKind::Hold);
    }

    #[test]
    fn short_series_is_not_warmed_up() {
        let data = make_symbol("NEW.BSE", &[100.0, 101.0, 99.0, 102.0]);
        let entries = scan_symbols(&[data], &BacktestConfig::default());

        assert_eq!(entries.len(), 1);
        assert!(!entries[0].warmed_up);
        assert_eq!(entries[0].signal.kind, SignalKind::Hold);
    }

    #[test]
    fn empty_series_is_omitted() {
        let empty = SymbolData::new("GONE.BSE".into(), vec![]);
        let data = make_symbol("TCS.BSE", &buy_setup_closes());
        let entries = scan_symbols(&[empty, data], &BacktestConfig::default());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].signal.symbol, "TCS.BSE");
    }

    #[test]
    fn output_is_alphabetical() {
        let closes = buy_setup_closes();
        let symbols = vec![
            make_symbol("ZEE.BSE", &closes),
            make_symbol("ACC.BSE", &closes),
            make_symbol("MRF.BSE", &closes),
        ];
        let entries = scan_symbols(&symbols, &BacktestConfig::default());

        let names: Vec<&str> = entries.iter().map(|e| e.signal.symbol.as_str()).collect();
        assert_eq!(names, vec!["ACC.BSE", "MRF.BSE", "ZEE.BSE"]);
    }
}
