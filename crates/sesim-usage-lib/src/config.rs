use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Unknown usage source '{0}' (expected dummy or report)")]
    UnknownSource(String),
}

/// Where the daily cost series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Dummy,
    Report,
}

impl SourceKind {
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dummy" => Ok(SourceKind::Dummy),
            "report" => Ok(SourceKind::Report),
            other => Err(ConfigError::UnknownSource(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_start")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end")]
    pub end_date: NaiveDate,
    #[serde(default = "default_source")]
    pub source: String,
    #[serde(default)]
    pub report_path: Option<PathBuf>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 4, 1).unwrap_or_default()
}
fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 14).unwrap_or_default()
}
fn default_source() -> String {
    "dummy".to_string()
}
fn default_refresh_secs() -> u64 {
    5
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            start_date: default_start(),
            end_date: default_end(),
            source: default_source(),
            report_path: None,
            seed: None,
            refresh_secs: default_refresh_secs(),
        }
    }
}

impl DashboardConfig {
    /// Get the config file path, respecting XDG_CONFIG_HOME
    pub fn config_path() -> PathBuf {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("sesim").join("config.toml")
    }

    /// Debug log written while the dashboard owns the terminal.
    pub fn log_path() -> PathBuf {
        Self::config_path().with_file_name("sesim-usage.log")
    }

    /// Load config from the default path, falling back to defaults if not found
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Self::config_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: DashboardConfig = toml::from_str(&content)?;
        config.source_kind()?;
        Ok(config)
    }

    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn source_kind(&self) -> Result<SourceKind, ConfigError> {
        SourceKind::parse(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_log_path_next_to_config() {
        let log = DashboardConfig::log_path();
        assert_eq!(log.parent(), DashboardConfig::config_path().parent());
        assert_eq!(log.file_name().unwrap(), "sesim-usage.log");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = DashboardConfig::load_from(dir.path().join("config.toml")).unwrap();

        assert_eq!(config.start_date, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert_eq!(config.end_date, NaiveDate::from_ymd_opt(2025, 6, 14).unwrap());
        assert_eq!(config.source_kind().unwrap(), SourceKind::Dummy);
        assert_eq!(config.refresh_secs, 5);
        assert!(config.report_path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "source = \"report\"\nreport_path = \"/tmp/usage.json\"\nseed = 42\n",
        )
        .unwrap();

        let config = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(config.source_kind().unwrap(), SourceKind::Report);
        assert_eq!(config.report_path, Some(PathBuf::from("/tmp/usage.json")));
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.start_date, default_start());
    }

    #[test]
    fn test_unknown_source_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "source = \"s3\"\n").unwrap();

        let err = DashboardConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSource(ref s) if s == "s3"));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "start_date = [").unwrap();

        assert!(matches!(
            DashboardConfig::load_from(&path),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = DashboardConfig {
            seed: Some(7),
            refresh_secs: 30,
            ..DashboardConfig::default()
        };
        config.save_to(&path).unwrap();

        let reloaded = DashboardConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.seed, Some(7));
        assert_eq!(reloaded.refresh_secs, 30);
    }
}
