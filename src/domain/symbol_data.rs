//! Per-symbol bar store and the cross-symbol timeline.

use chrono::{Duration, NaiveDate};
use std::collections::{BTreeSet, HashMap};

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct SymbolData {
    pub symbol: String,
    pub bars: Vec<OhlcvBar>,
    pub date_index: HashMap<NaiveDate, usize>,
}

impl SymbolData {
    pub fn new(symbol: String, bars: Vec<OhlcvBar>) -> Self {
        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();
        Self {
            symbol,
            bars,
            date_index,
        }
    }

    pub fn bar_count(&self) -> usize {
        self.bars.len()
    }

    pub fn get_bar(&self, date: NaiveDate) -> Option<&OhlcvBar> {
        self.date_index.get(&date).map(|&i| &self.bars[i])
    }

    pub fn get_bar_index(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|bar| bar.date)
    }

    /// Restrict to the trailing window of `days` calendar days ending at
    /// `end`, inclusive of both endpoints. Bars outside the window are
    /// dropped before any indicator computation.
    pub fn restrict_window(&self, end: NaiveDate, days: i64) -> SymbolData {
        let start = end - Duration::days(days);
        let bars: Vec<OhlcvBar> = self
            .bars
            .iter()
            .filter(|bar| bar.date >= start && bar.date <= end)
            .cloned()
            .collect();
        SymbolData::new(self.symbol.clone(), bars)
    }
}

/// Merged, sorted set of all dates any symbol traded on.
pub fn build_unified_timeline(symbols: &[SymbolData]) -> Vec<NaiveDate> {
    let unique_dates: BTreeSet<NaiveDate> = symbols
        .iter()
        .flat_map(|sd| sd.bars.iter().map(|bar| bar.date))
        .collect();
    unique_dates.into_iter().collect()
}

/// Latest date available in every symbol's series: the evaluation window
/// ends here so no symbol is asked for bars it does not have.
pub fn latest_common_date(symbols: &[SymbolData]) -> Option<NaiveDate> {
    symbols
        .iter()
        .map(|sd| sd.last_date())
        .collect::<Option<Vec<_>>>()?
        .into_iter()
        .min()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bar(symbol: &str, date: &str, close: f64) -> OhlcvBar {
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

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_builds_date_index() {
        let bars = vec![
            make_bar("TCS.BSE", "2024-01-01", 100.0),
            make_bar("TCS.BSE", "2024-01-02", 101.0),
            make_bar("TCS.BSE", "2024-01-03", 102.0),
        ];
        let sd = SymbolData::new("TCS.BSE".into(), bars);

        assert_eq!(sd.bar_count(), 3);
        assert_eq!(sd.get_bar_index(date(2024, 1, 2)), Some(1));
        assert!(sd.get_bar(date(2024, 1, 5)).is_none());
        assert_eq!(sd.get_bar(date(2024, 1, 3)).unwrap().close, 102.0);
    }

    #[test]
    fn first_and_last_date() {
        let sd = SymbolData::new(
            "TCS.BSE".into(),
            vec![
                make_bar("TCS.BSE", "2024-01-01", 100.0),
                make_bar("TCS.BSE", "2024-01-05", 101.0),
            ],
        );
        assert_eq!(sd.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(sd.last_date(), Some(date(2024, 1, 5)));

        let empty = SymbolData::new("X".into(), vec![]);
        assert!(empty.first_date().is_none());
        assert!(empty.last_date().is_none());
    }

    #[test]
    fn restrict_window_drops_old_bars() {
        let bars: Vec<OhlcvBar> = (0..300)
            .map(|i| {
                let d = date(2023, 1, 1) + Duration::days(i);
                make_bar("TCS.BSE", &d.format("%Y-%m-%d").to_string(), 100.0)
            })
            .collect();
        let sd = SymbolData::new("TCS.BSE".into(), bars);
        let end = sd.last_date().unwrap();

        let windowed = sd.restrict_window(end, 180);

        assert_eq!(windowed.bar_count(), 181);
        assert_eq!(windowed.last_date(), Some(end));
        assert_eq!(windowed.first_date(), Some(end - Duration::days(180)));
    }

    #[test]
    fn restrict_window_keeps_short_series_intact() {
        let bars: Vec<OhlcvBar> = (0..90)
            .map(|i| {
                let d = date(2024, 1, 1) + Duration::days(i);
                make_bar("TCS.BSE", &d.format("%Y-%m-%d").to_string(), 100.0)
            })
            .collect();
        let sd = SymbolData::new("TCS.BSE".into(), bars);
        let end = sd.last_date().unwrap();

        let windowed = sd.restrict_window(end, 180);

        // 90 usable bars, never fabricated up to 180.
        assert_eq!(windowed.bar_count(), 90);
    }

    #[test]
    fn unified_timeline_merges_and_sorts() {
        let tcs = SymbolData::new(
            "TCS.BSE".into(),
            vec![
                make_bar("TCS.BSE", "2024-01-02", 100.0),
                make_bar("TCS.BSE", "2024-01-05", 101.0),
            ],
        );
        let infy = SymbolData::new(
            "INFY.BSE".into(),
            vec![
                make_bar("INFY.BSE", "2024-01-01", 50.0),
                make_bar("INFY.BSE", "2024-01-03", 51.0),
                make_bar("INFY.BSE", "2024-01-05", 52.0),
            ],
        );

        let timeline = build_unified_timeline(&[tcs, infy]);

        assert_eq!(
            timeline,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 5),
            ]
        );
    }

    #[test]
    fn unified_timeline_empty() {
        assert!(build_unified_timeline(&[]).is_empty());
    }

    #[test]
    fn latest_common_date_is_min_of_maxes() {
        let a = SymbolData::new(
            "A".into(),
            vec![
                make_bar("A", "2024-01-01", 1.0),
                make_bar("A", "2024-01-10", 1.0),
            ],
        );
        let b = SymbolData::new(
            "B".into(),
            vec![
                make_bar("B", "2024-01-01", 1.0),
                make_bar("B", "2024-01-07", 1.0),
            ],
        );

        assert_eq!(latest_common_date(&[a, b]), Some(date(2024, 1, 7)));
    }

    #[test]
    fn latest_common_date_none_for_empty_series() {
        let a = SymbolData::new(
            "A".into(),
            vec![make_bar("A", "2024-01-01", 1.0)],
        );
        let empty = SymbolData::new("B".into(), vec![]);

        assert!(latest_common_date(&[a, empty]).is_none());
        assert!(latest_common_date(&[]).is_none());
    }
}
