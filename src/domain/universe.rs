//! Symbol universe parsing and per-symbol data validation.
//!
//! A symbol that fails any check is skipped with a recorded reason; the
//! run continues with whatever survives. Only an empty surviving universe
//! is fatal, and that is decided by the caller.

use chrono::NaiveDate;
use std::fmt;

use super::error::RsitraderError;
use super::ohlcv::validate_series;
use super::symbol_data::SymbolData;
use crate::ports::data_port::DataPort;

/// Why a symbol was excluded from the run.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    NoBars,
    TooFewBars { bars: usize, minimum: usize },
    BadSeries(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::FetchFailed(reason) => write!(f, "fetch failed: {reason}"),
            SkipReason::NoBars => write!(f, "no bars in range"),
            SkipReason::TooFewBars { bars, minimum } => {
                write!(f, "only {bars} bars, need {minimum}")
            }
            SkipReason::BadSeries(reason) => write!(f, "bad series: {reason}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

/// Split a comma-separated symbol list, trimming and uppercasing each
/// entry. Duplicates are a configuration error.
pub fn parse_symbols(raw: &str) -> Result<Vec<String>, RsitraderError> {
    let mut symbols: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let symbol = part.trim().to_uppercase();
        if symbol.is_empty() {
            continue;
        }
        if symbols.contains(&symbol) {
            return Err(RsitraderError::ConfigInvalid {
                section: "universe".into(),
                key: "symbols".into(),
                reason: format!("duplicate symbol {symbol}"),
            });
        }
        symbols.push(symbol);
    }
    if symbols.is_empty() {
        return Err(RsitraderError::ConfigInvalid {
            section: "universe".into(),
            key: "symbols".into(),
            reason: "no symbols given".into(),
        });
    }
    Ok(symbols)
}

/// Fetch and vet every symbol in the universe. Returns the usable series
/// plus a skip record per excluded symbol.
pub fn load_universe(
    data_port: &dyn DataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
    minimum_bars: usize,
) -> (Vec<SymbolData>, Vec<SkippedSymbol>) {
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        let bars = match data_port.fetch_ohlcv(symbol, start_date, end_date) {
            Ok(bars) => bars,
            Err(err) => {
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::FetchFailed(err.to_string()),
                });
                continue;
            }
        };
        if bars.is_empty() {
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::NoBars,
            });
            continue;
        }
        if bars.len() < minimum_bars {
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::TooFewBars {
                    bars: bars.len(),
                    minimum: minimum_bars,
                },
            });
            continue;
        }
        if let Err(err) = validate_series(&bars) {
            skipped.push(SkippedSymbol {
                symbol: symbol.clone(),
                reason: SkipReason::BadSeries(err.to_string()),
            });
            continue;
        }
        loaded.push(SymbolData::new(symbol.clone(), bars));
    }

    (loaded, skipped)
}
