use std::fs::File;
use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use simplelog::{Config, WriteLogger};

use crate::error::ConfigError;

/// Where the log goes and how much of it. The terminal belongs to the UI, so
/// logging is file-only.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of `off`, `error`, `warn`, `info`, `debug`, `trace`.
    pub level: String,
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: PathBuf::from("power_four.log"),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.level.trim()).map_err(|_| {
            ConfigError::Validation(format!("logging.level '{}' is not a log level", self.level))
        })
    }
}

/// Install the file logger. If the file can't be created the game runs without
/// logging.
pub fn init(config: &LoggingConfig) {
    let level = config.level_filter().unwrap_or(LevelFilter::Info);
    if level == LevelFilter::Off {
        return;
    }

    if let Ok(file) = File::create(&config.file) {
        let _ = WriteLogger::init(level, Config::default(), file);
        log::info!("Logger initialized at {level}.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_filter_parses_names() {
        let mut config = LoggingConfig::default();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Info);

        config.level = "DEBUG".to_string();
        assert_eq!(config.level_filter().unwrap(), LevelFilter::Debug);

        config.level = "chatty".to_string();
        assert!(config.level_filter().is_err());
    }
}
