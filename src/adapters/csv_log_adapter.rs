//! CSV logging sink.
//!
//! Appends trade closes to `trade_log.csv`, per-bar snapshots to
//! `portfolio_history.csv`, and the final report to `performance.csv`
//! under the configured log directory. A header row is written when a
//! file is first created. Write failures are printed to stderr and
//! otherwise ignored; the sink never fails the run.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::domain::metrics::PerformanceReport;
use crate::domain::portfolio::PortfolioSnapshot;
use crate::domain::position::ClosedTrade;
use crate::ports::notify_port::NotifyPort;

pub struct CsvLogAdapter {
    log_dir: PathBuf,
}

impl CsvLogAdapter {
    pub fn new(log_dir: PathBuf) -> std::io::Result<Self> {
        std::fs::create_dir_all(&log_dir)?;
        Ok(Self { log_dir })
    }

    fn append_row(&self, file_name: &str, header: &[&str], row: &[String]) {
        let path = self.log_dir.join(file_name);
        if let Err(e) = append_row_inner(&path, header, row) {
            eprintln!("Warning: failed to write {}: {}", path.display(), e);
        }
    }
}

fn append_row_inner(path: &Path, header: &[&str], row: &[String]) -> std::io::Result<()> {
    let new_file = !path.exists();
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut wtr = csv::Writer::from_writer(file);
    if new_file {
        wtr.write_record(header)?;
    }
    wtr.write_record(row)?;
    wtr.flush()?;
    Ok(())
}

fn format_optional(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.4}"),
        None => "N/A".to_string(),
    }
}

impl NotifyPort for CsvLogAdapter {
    fn trade_closed(&self, trade: &ClosedTrade) {
        self.append_row(
            "trade_log.csv",
            &[
                "symbol",
                "quantity",
                "entry_date",
                "entry_price",
                "exit_date",
                "exit_price",
                "pnl",
                "rsi_at_entry",
            ],
            &[
                trade.symbol.clone(),
                trade.quantity.to_string(),
                trade.entry_date.to_string(),
                format!("{:.2}", trade.entry_price),
                trade.exit_date.to_string(),
                format!("{:.2}", trade.exit_price),
                format!("{:.2}", trade.pnl),
                format!("{:.2}", trade.rsi_at_entry),
            ],
        );
    }

    fn portfolio_snapshot(&self, snapshot: &PortfolioSnapshot) {
        self.append_row(
            "portfolio_history.csv",
            &["date", "cash", "equity", "cumulative_pnl", "open_positions"],
            &[
                snapshot.date.to_string(),
                format!("{:.2}", snapshot.cash),
                format!("{:.2}", snapshot.equity),
                format!("{:.2}", snapshot.cumulative_pnl),
                snapshot.open_positions.to_string(),
            ],
        );
    }

    fn run_completed(&self, report: &PerformanceReport) {
        self.append_row(
            "performance.csv",
            &[
                "total_return",
                "annualized_return",
                "sharpe_ratio",
                "max_drawdown",
                "win_rate",
                "total_trades",
                "trades_won",
                "trades_lost",
                "avg_win",
                "avg_loss",
            ],
            &[
                format!("{:.4}", report.total_return),
                format!("{:.4}", report.annualized_return),
                format_optional(report.sharpe_ratio),
                format!("{:.4}", report.max_drawdown),
                format_optional(report.win_rate),
                report.total_trades.to_string(),
                report.trades_won.to_string(),
                report.trades_lost.to_string(),
                format!("{:.2}", report.avg_win),
                format!("{:.2}", report.avg_loss),
            ],
        );
    }
}
