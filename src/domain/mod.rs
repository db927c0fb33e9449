//! Core domain types and logic.

pub mod ohlcv;
pub mod indicator;
pub mod signal;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod symbol_data;
pub mod metrics;
pub mod backtest;
pub mod scan;
pub mod universe;
pub mod config_validation;
pub mod error;
