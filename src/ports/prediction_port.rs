//! Optional auxiliary signal provider port.
//!
//! The prediction score is carried on the signal as extra context only;
//! the indicator rule remains authoritative and behavior is identical
//! whether or not a provider is wired in.

use crate::domain::indicator::IndicatorSnapshot;

pub trait PredictionPort {
    /// Auxiliary score for the current indicator state, if the provider
    /// can produce one.
    fn predict(&self, snapshot: &IndicatorSnapshot) -> Option<f64>;
}
