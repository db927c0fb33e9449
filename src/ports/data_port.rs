//! Market data access port.

use chrono::NaiveDate;

use crate::domain::error::RsitraderError;
use crate::domain::ohlcv::OhlcvBar;

/// Supplies an ordered bar sequence per symbol for a requested date range.
/// A data-unavailable condition is surfaced as an error; the orchestrator
/// excludes the symbol rather than retrying internally.
pub trait DataPort {
    fn fetch_ohlcv(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, RsitraderError>;

    fn list_symbols(&self) -> Result<Vec<String>, RsitraderError>;

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, RsitraderError>;
}
