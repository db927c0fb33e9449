#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use rsitrader::domain::backtest::BacktestConfig;
use rsitrader::domain::error::RsitraderError;
use rsitrader::domain::metrics::PerformanceReport;
use rsitrader::domain::portfolio::PortfolioSnapshot;
use rsitrader::domain::position::ClosedTrade;
use rsitrader::domain::symbol_data::SymbolData;
pub use rsitrader::domain::ohlcv::OhlcvBar;
use rsitrader::ports::data_port::DataPort;
use rsitrader::ports::notify_port::NotifyPort;
use std::cell::RefCell;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, RsitraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(RsitraderError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|bar| bar.date >= start_date && bar.date <= end_date)
            .collect())
    }

    fn list_symbols(&self) -> Result<Vec<String>, RsitraderError> {
        Ok(self.data.keys().cloned().collect())
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsitraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(RsitraderError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(bars) if !bars.is_empty() => {
                let min = bars.iter().map(|b| b.date).min().unwrap();
                let max = bars.iter().map(|b| b.date).max().unwrap();
                Ok(Some((min, max, bars.len())))
            }
            _ => Ok(None),
        }
    }
}

/// Counts every notifier event for a run.
#[derive(Default)]
pub struct RecordingNotifier {
    pub trades: RefCell<Vec<ClosedTrade>>,
    pub snapshots: RefCell<Vec<PortfolioSnapshot>>,
    pub reports: RefCell<Vec<PerformanceReport>>,
}

impl NotifyPort for RecordingNotifier {
    fn trade_closed(&self, trade: &ClosedTrade) {
        self.trades.borrow_mut().push(trade.clone());
    }

    fn portfolio_snapshot(&self, snapshot: &PortfolioSnapshot) {
        self.snapshots.borrow_mut().push(snapshot.clone());
    }

    fn run_completed(&self, report: &PerformanceReport) {
        self.reports.borrow_mut().push(report.clone());
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
    OhlcvBar {
        symbol: symbol.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// Bars on consecutive calendar days starting at `start`, with the given
/// closes.
pub fn bars_from_closes(symbol: &str, start: NaiveDate, closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            symbol: symbol.to_string(),
            date: start + Duration::days(i as i64),
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn make_symbol_data(symbol: &str, start: NaiveDate, closes: &[f64]) -> SymbolData {
    SymbolData::new(symbol.to_string(), bars_from_closes(symbol, start, closes))
}

/// Slow uptrend, sharp three-bar drop, sharp rally, quiet tail. Produces
/// exactly one buy (oversold during an intact uptrend) and one sell
/// (overbought on the rally) under default thresholds.
pub fn one_trade_closes() -> Vec<f64> {
    let mut closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.1).collect();
    let mut price = *closes.last().unwrap();
    for _ in 0..3 {
        price -= 3.0;
        closes.push(price);
    }
    for _ in 0..12 {
        price += 3.0;
        closes.push(price);
    }
    for i in 0..15 {
        price += if i % 2 == 0 { 0.01 } else { -0.01 };
        closes.push(price);
    }
    closes
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        window_days: 365,
        ..BacktestConfig::default()
    }
}
