//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_log_adapter::CsvLogAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::null_notifier::NullNotifier;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, BacktestResult};
use crate::domain::config_validation::{minimum_bars, validate_config};
use crate::domain::error::RsitraderError;
use crate::domain::indicator::IndicatorParams;
use crate::domain::scan::scan_symbols;
use crate::domain::signal::{SignalKind, SignalThresholds};
use crate::domain::universe::{load_universe, parse_symbols};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::notify_port::NotifyPort;

#[derive(Parser, Debug)]
#[command(name = "rsitrader", about = "RSI + SMA crossover backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest over the trailing window
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Override the configured symbol universe (comma-separated)
        #[arg(long)]
        symbols: Option<String>,
        /// Override the configured log directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Disable CSV logging for this run
        #[arg(long)]
        no_log: bool,
    },
    /// Evaluate the entry rule on each symbol's latest bar
    Scan {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Show the effective configuration
    Config {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        symbol: Option<String>,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            symbols,
            output,
            no_log,
        } => run_backtest(&config, symbols.as_deref(), output, no_log),
        Command::Scan { config, symbols } => run_scan(&config, symbols.as_deref()),
        Command::Config { config } => run_show_config(&config),
        Command::Info { config, symbol } => run_info(&config, symbol.as_deref()),
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Read an indicator period, collapsing negative values to 0 so that
/// `validate_config` rejects them instead of a cast wrapping them around.
fn strategy_period(adapter: &dyn ConfigPort, key: &str, default: i64) -> usize {
    adapter
        .get_int("strategy", key, default)
        .try_into()
        .unwrap_or(0)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> BacktestConfig {
    BacktestConfig {
        initial_capital: adapter.get_double("backtest", "initial_capital", 100_000.0),
        risk_fraction: adapter.get_double("backtest", "risk_fraction", 0.02),
        window_days: adapter.get_int("backtest", "window_days", 180),
        indicators: IndicatorParams {
            rsi_period: strategy_period(adapter, "rsi_period", 14),
            sma_short: strategy_period(adapter, "sma_short", 20),
            sma_long: strategy_period(adapter, "sma_long", 50),
        },
        thresholds: SignalThresholds {
            oversold: adapter.get_double("strategy", "rsi_oversold", 35.0),
            overbought: adapter.get_double("strategy", "rsi_overbought", 65.0),
        },
    }
}

fn resolve_symbols(
    symbols_override: Option<&str>,
    adapter: &dyn ConfigPort,
) -> Result<Vec<String>, RsitraderError> {
    let raw = match symbols_override {
        Some(s) => s.to_string(),
        None => adapter.get_string("universe", "symbols").ok_or_else(|| {
            RsitraderError::ConfigMissing {
                section: "universe".into(),
                key: "symbols".into(),
            }
        })?,
    };
    parse_symbols(&raw)
}

fn build_data_port(adapter: &dyn ConfigPort) -> Result<CsvAdapter, RsitraderError> {
    let path = adapter
        .get_string("data", "path")
        .ok_or_else(|| RsitraderError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(PathBuf::from(path)))
}

/// Load and vet the universe; symbols are fetched unbounded and the
/// engine trims to the trailing window itself.
fn load_run_inputs(
    adapter: &dyn ConfigPort,
    symbols_override: Option<&str>,
    bt_config: &BacktestConfig,
) -> Result<Vec<crate::domain::symbol_data::SymbolData>, RsitraderError> {
    let data_port = build_data_port(adapter)?;
    let symbols = resolve_symbols(symbols_override, adapter)?;

    eprintln!("Validating {} symbols...", symbols.len());
    let (loaded, skipped) = load_universe(
        &data_port,
        &symbols,
        chrono::NaiveDate::MIN,
        chrono::NaiveDate::MAX,
        minimum_bars(bt_config),
    );
    for skip in &skipped {
        eprintln!("warning: skipping {} ({})", skip.symbol, skip.reason);
    }
    if loaded.is_empty() {
        return Err(RsitraderError::NoData {
            symbol: "all".into(),
        });
    }
    Ok(loaded)
}

fn run_backtest(
    config_path: &PathBuf,
    symbols_override: Option<&str>,
    output: Option<PathBuf>,
    no_log: bool,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = build_backtest_config(&adapter);
    if let Err(e) = validate_config(&bt_config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let symbols = match load_run_inputs(&adapter, symbols_override, &bt_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let log_enabled = !no_log && adapter.get_bool("log", "enabled", true);
    let csv_log = if log_enabled {
        let log_dir = output.unwrap_or_else(|| {
            PathBuf::from(
                adapter
                    .get_string("log", "dir")
                    .unwrap_or_else(|| "./logs".to_string()),
            )
        });
        match CsvLogAdapter::new(log_dir) {
            Ok(a) => Some(a),
            Err(e) => {
                eprintln!("error: failed to prepare log directory: {e}");
                return ExitCode::from(1);
            }
        }
    } else {
        None
    };
    let notifier: &dyn NotifyPort = match &csv_log {
        Some(adapter) => adapter,
        None => &NullNotifier,
    };

    eprintln!(
        "Running backtest: {} symbols, {} day window",
        symbols.len(),
        bt_config.window_days
    );

    let result = match backtest_engine::run_backtest(&symbols, &bt_config, notifier, None) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    print_summary(&result, &bt_config);
    ExitCode::SUCCESS
}

fn print_summary(result: &BacktestResult, bt_config: &BacktestConfig) {
    let report = &result.report;
    let window = &result.window;

    eprintln!(
        "\nEvaluation window: {} to {}",
        window.start, window.end
    );
    if window.truncated {
        eprintln!(
            "  (requested {} days, data covers less; window truncated)",
            window.requested_days
        );
    }

    eprintln!("\n=== Results ===");
    eprintln!("Initial Capital:  {:.2}", bt_config.initial_capital);
    eprintln!(
        "Final Equity:     {:.2}",
        result
            .portfolio
            .equity_curve
            .last()
            .map(|p| p.equity)
            .unwrap_or(bt_config.initial_capital)
    );
    eprintln!("Total Return:     {:.2}%", report.total_return * 100.0);
    eprintln!("Annualized:       {:.2}%", report.annualized_return * 100.0);
    match report.sharpe_ratio {
        Some(sharpe) => eprintln!("Sharpe Ratio:     {sharpe:.2}"),
        None => eprintln!("Sharpe Ratio:     N/A"),
    }
    eprintln!("Max Drawdown:     -{:.1}%", report.max_drawdown * 100.0);
    eprintln!("Total Trades:     {}", report.total_trades);
    match report.win_rate {
        Some(rate) => eprintln!("Win Rate:         {:.1}%", rate * 100.0),
        None => eprintln!("Win Rate:         N/A"),
    }
    eprintln!("Avg Win:          {:.2}", report.avg_win);
    eprintln!("Avg Loss:         {:.2}", report.avg_loss);

    if !result.portfolio.closed_trades.is_empty() {
        eprintln!("\n=== Trades ===");
        for trade in &result.portfolio.closed_trades {
            let sign = if trade.pnl >= 0.0 { "+" } else { "" };
            eprintln!(
                "  {} x{}  {} @ {:.2} -> {} @ {:.2}  {}{:.2}",
                trade.symbol,
                trade.quantity,
                trade.entry_date,
                trade.entry_price,
                trade.exit_date,
                trade.exit_price,
                sign,
                trade.pnl,
            );
        }
    }

    let open = result.portfolio.position_count();
    if open > 0 {
        eprintln!("\n{open} position(s) still open at end of window");
    }
}

fn run_scan(config_path: &PathBuf, symbols_override: Option<&str>) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = build_backtest_config(&adapter);
    if let Err(e) = validate_config(&bt_config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let symbols = match load_run_inputs(&adapter, symbols_override, &bt_config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let entries = scan_symbols(&symbols, &bt_config);

    eprintln!("\n=== Scan ===");
    for entry in &entries {
        let signal = &entry.signal;
        let rsi = match signal.rsi {
            Some(rsi) => format!("{rsi:.1}"),
            None => "N/A".to_string(),
        };
        let note = if entry.warmed_up { "" } else { "  (warming up)" };
        println!(
            "{}  {}  close {:.2}  RSI {}{}",
            signal.symbol, signal.kind, signal.price, rsi, note
        );
    }

    let buys = entries
        .iter()
        .filter(|e| e.signal.kind == SignalKind::Buy)
        .count();
    eprintln!("\n{} symbols scanned, {} buy setups", entries.len(), buys);
    ExitCode::SUCCESS
}

fn run_show_config(config_path: &PathBuf) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let bt_config = build_backtest_config(&adapter);
    if let Err(e) = validate_config(&bt_config) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    println!("Configuration ({}):", config_path.display());
    println!(
        "  data path:       {}",
        adapter
            .get_string("data", "path")
            .unwrap_or_else(|| "<unset>".to_string())
    );
    println!("  initial capital: {:.2}", bt_config.initial_capital);
    println!(
        "  risk per trade:  {:.1}%",
        bt_config.risk_fraction * 100.0
    );
    println!("  window:          {} days", bt_config.window_days);
    println!(
        "  RSI:             period {}, buy < {}, sell > {}",
        bt_config.indicators.rsi_period,
        bt_config.thresholds.oversold,
        bt_config.thresholds.overbought
    );
    println!(
        "  SMA cross:       {} / {}",
        bt_config.indicators.sma_short, bt_config.indicators.sma_long
    );
    println!(
        "  symbols:         {}",
        adapter
            .get_string("universe", "symbols")
            .unwrap_or_else(|| "<unset>".to_string())
    );
    ExitCode::SUCCESS
}

/// Symbols the `info` command reports on: an explicit override, else the
/// configured universe, else everything present in the data directory.
fn info_symbols(
    symbol_override: Option<&str>,
    adapter: &dyn ConfigPort,
    data_port: &dyn DataPort,
) -> Result<Vec<String>, RsitraderError> {
    if let Some(symbol) = symbol_override {
        return Ok(vec![symbol.to_uppercase()]);
    }
    match adapter.get_string("universe", "symbols") {
        Some(raw) => parse_symbols(&raw),
        None => data_port.list_symbols(),
    }
}

fn run_info(config_path: &PathBuf, symbol_override: Option<&str>) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let data_port = match build_data_port(&adapter) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let symbols = match info_symbols(symbol_override, &adapter, &data_port) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for symbol in &symbols {
        match data_port.get_data_range(symbol) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{symbol}: {count} bars, {min_date} to {max_date}");
            }
            Ok(None) => {
                eprintln!("{symbol}: no data found");
            }
            Err(e) => {
                eprintln!("error querying {symbol}: {e}");
            }
        }
    }
    ExitCode::SUCCESS
}
