pub mod csv_adapter;
pub mod csv_log_adapter;
pub mod file_config_adapter;
pub mod null_notifier;
