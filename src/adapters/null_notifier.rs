//! No-op notification sink.

use crate::domain::metrics::PerformanceReport;
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::position::ClosedTrade;
use crate::ports::notify_port::NotifyPort;

/// Discards every event. Used when logging is disabled and in tests.
pub struct NullNotifier;

impl NotifyPort for NullNotifier {
    fn trade_closed(&self, _trade: &ClosedTrade) {}

    fn portfolio_snapshot(&self, _snapshot: &PortfolioSnapshot) {}

    fn run_completed(&self, _report: &PerformanceReport) {}
}
