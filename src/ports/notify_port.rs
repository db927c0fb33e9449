//! Logging/notification sink port.
//!
//! Every call is best-effort: implementations swallow their own failures
//! and must never block or corrupt the simulation. The methods are
//! infallible by design so the orchestrator cannot accidentally propagate
//! a sink error into the run.

use crate::domain::metrics::PerformanceReport;
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::position::ClosedTrade;

pub trait NotifyPort {
    /// Invoked when a position closes into a trade record.
    fn trade_closed(&self, trade: &ClosedTrade);

    /// Invoked at the end of each bar.
    fn portfolio_snapshot(&self, snapshot: &PortfolioSnapshot);

    /// Invoked once at the end of a run.
    fn run_completed(&self, report: &PerformanceReport);
}
