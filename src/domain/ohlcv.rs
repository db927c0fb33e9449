//! OHLCV bar representation and series validation.

use chrono::NaiveDate;

/// One sampled daily observation of an instrument. Immutable once ingested.
#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Problems detected in a per-symbol bar series.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SeriesError {
    #[error("duplicate bar on {0}")]
    DuplicateDate(NaiveDate),

    #[error("bars out of order at {0}")]
    OutOfOrder(NaiveDate),
}

/// Check that a bar series is strictly increasing by date.
///
/// Duplicate dates and non-monotonic ordering are data errors; callers
/// exclude the offending symbol rather than aborting the run.
pub fn validate_series(bars: &[OhlcvBar]) -> Result<(), SeriesError> {
    for pair in bars.windows(2) {
        if pair[1].date == pair[0].date {
            return Err(SeriesError::DuplicateDate(pair[1].date));
        }
        if pair[1].date < pair[0].date {
            return Err(SeriesError::OutOfOrder(pair[1].date));
        }
    }
    Ok(())
}
