//! INI file configuration adapter.

use configparser::ini::Ini;
use std::path::Path;

use crate::domain::error::RsitraderError;
use crate::ports::config_port::ConfigPort;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RsitraderError> {
        let mut config = Ini::new();
        config
            .load(path.as_ref())
            .map_err(|e| RsitraderError::ConfigParse {
                file: path.as_ref().display().to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, RsitraderError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|e| RsitraderError::ConfigParse {
                file: "<inline>".to_string(),
                reason: e,
            })?;
        Ok(Self { config })
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_ref()
            .and_then(|v| Self::parse_bool(v))
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
[data]
path = ./data

[backtest]
initial_capital = 100000.0
risk_fraction = 0.02
window_days = 180

[strategy]
rsi_period = 14
rsi_oversold = 35
rsi_overbought = 65
sma_short = 20
sma_long = 50

[universe]
symbols = RELIANCE.BSE,TCS.BSE

[log]
enabled = yes
dir = ./logs
"#;

    #[test]
    fn from_string_parses_all_sections() {
        let adapter = FileConfigAdapter::from_string(SAMPLE).unwrap();

        assert_eq!(adapter.get_string("data", "path"), Some("./data".into()));
        assert_eq!(
            adapter.get_double("backtest", "initial_capital", 0.0),
            100000.0
        );
        assert_eq!(adapter.get_double("backtest", "risk_fraction", 0.0), 0.02);
        assert_eq!(adapter.get_int("backtest", "window_days", 0), 180);
        assert_eq!(adapter.get_int("strategy", "rsi_period", 0), 14);
        assert_eq!(
            adapter.get_string("universe", "symbols"),
            Some("RELIANCE.BSE,TCS.BSE".into())
        );
        assert!(adapter.get_bool("log", "enabled", false));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let adapter = FileConfigAdapter::from_string("[backtest]\n").unwrap();

        assert_eq!(adapter.get_string("backtest", "missing"), None);
        assert_eq!(adapter.get_int("backtest", "window_days", 180), 180);
        assert_eq!(adapter.get_double("backtest", "risk_fraction", 0.02), 0.02);
        assert!(adapter.get_bool("log", "enabled", true));
    }

    #[test]
    fn non_numeric_values_fall_back_to_defaults() {
        let adapter =
            FileConfigAdapter::from_string("[backtest]\nwindow_days = soon\n").unwrap();
        assert_eq!(adapter.get_int("backtest", "window_days", 180), 180);
    }

    #[test]
    fn bool_parsing_accepts_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[log]\na = true\nb = No\nc = 1\nd = 0\n").unwrap();
        assert!(adapter.get_bool("log", "a", false));
        assert!(!adapter.get_bool("log", "b", true));
        assert!(adapter.get_bool("log", "c", false));
        assert!(!adapter.get_bool("log", "d", true));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_int("strategy", "sma_long", 0), 50);
    }

    #[test]
    fn from_file_errors_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/config.ini");
        assert!(matches!(result, Err(RsitraderError::ConfigParse { .. })));
    }
}
