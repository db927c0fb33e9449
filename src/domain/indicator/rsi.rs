//! RSI (Relative Strength Index) indicator.
//!
//! Uses Wilder's smoothing for average gain/loss calculation:
//! - First average: simple mean of gains/losses over the first n changes
//! - Subsequent: avg = (prev_avg * (n-1) + current) / n
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first n bars are `None` (n price changes need n+1 bars).

use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> Vec<Option<f64>> {
    if period == 0 || bars.len() < 2 {
        return vec![None; bars.len()];
    }

    let changes: Vec<f64> = bars
        .windows(2)
        .map(|pair| pair[1].close - pair[0].close)
        .collect();

    let mut values = vec![None; bars.len()];
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;

    for (i, &change) in changes.iter().enumerate() {
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        if i + 1 < period {
            continue;
        } else if i + 1 == period {
            avg_gain = changes[..period]
                .iter()
                .map(|&c| c.max(0.0))
                .sum::<f64>()
                / period as f64;
            avg_loss = changes[..period]
                .iter()
                .map(|&c| (-c).max(0.0))
                .sum::<f64>()
                / period as f64;
        } else {
            avg_gain = (avg_gain * (period - 1) as f64 + gain) / period as f64;
            avg_loss = (avg_loss * (period - 1) as f64 + loss) / period as f64;
        }

        let rsi = if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
        };
        values[i + 1] = Some(rsi);
    }

    values
}
