//! Dashboard configuration file support.
//!
//! Settings come from `dashboard.toml` when one is found, fall back to
//! defaults otherwise, and are finally overridden by environment variables.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::models::{DisplayZone, TimeRange};
use crate::services::dashboard::DEFAULT_RECENT_LIMIT;

pub const CONFIG_FILENAME: &str = "dashboard.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Complete dashboard configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub charts: ChartSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSettings {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    /// Range used when a request names none. Parsed leniently.
    #[serde(default = "default_range_key")]
    pub default_range: String,
    /// Fixed display offset east of UTC. Unset means the system local zone.
    #[serde(default)]
    pub utc_offset_minutes: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_range_key() -> String {
    TimeRange::Day.key().to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("exports")
}

fn default_chart_width() -> u32 {
    800
}

fn default_chart_height() -> u32 {
    400
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            default_range: default_range_key(),
            utc_offset_minutes: None,
        }
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DashboardConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Locate `dashboard.toml` in the standard locations.
    ///
    /// Searches for `dashboard.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    pub fn find_default_file() -> Option<PathBuf> {
        [
            PathBuf::from(CONFIG_FILENAME),
            Path::new("backend").join(CONFIG_FILENAME),
            Path::new("..").join(CONFIG_FILENAME),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load from the default location (or defaults) and apply environment
    /// overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let config = match Self::find_default_file() {
            Some(path) => {
                log::info!("Loading configuration from {}", path.display());
                Self::from_file(path)?
            }
            None => {
                log::info!("No {} found, using defaults", CONFIG_FILENAME);
                Self::default()
            }
        };
        config.with_env_overrides()
    }

    /// Apply `HOST`, `PORT`, `DASHBOARD_RANGE`,
    /// `DASHBOARD_UTC_OFFSET_MINUTES` and `EXPORT_DIR`.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(host) = env::var("HOST") {
            self.server.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::invalid("PORT", format!("{} ({})", port, e)))?;
        }
        if let Ok(range) = env::var("DASHBOARD_RANGE") {
            self.dashboard.default_range = range;
        }
        if let Ok(offset) = env::var("DASHBOARD_UTC_OFFSET_MINUTES") {
            let minutes: i32 = offset.trim().parse().map_err(|e| {
                ConfigError::invalid("DASHBOARD_UTC_OFFSET_MINUTES", format!("{} ({})", offset, e))
            })?;
            self.dashboard.utc_offset_minutes = Some(minutes);
        }
        if let Ok(dir) = env::var("EXPORT_DIR") {
            self.export.output_dir = PathBuf::from(dir);
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.charts.width == 0 || self.charts.height == 0 {
            return Err(ConfigError::invalid(
                "charts",
                format!(
                    "chart size must be non-zero, got {}x{}",
                    self.charts.width, self.charts.height
                ),
            ));
        }
        if let Some(minutes) = self.dashboard.utc_offset_minutes {
            if DisplayZone::from_offset_minutes(minutes).is_none() {
                return Err(ConfigError::invalid(
                    "dashboard.utc_offset_minutes",
                    format!("{} is not a valid UTC offset", minutes),
                ));
            }
        }
        Ok(())
    }

    /// Range for requests that name none.
    pub fn default_range(&self) -> TimeRange {
        TimeRange::from_key(&self.dashboard.default_range)
    }

    /// Zone used for every human-readable time string.
    pub fn display_zone(&self) -> DisplayZone {
        self.dashboard
            .utc_offset_minutes
            .and_then(DisplayZone::from_offset_minutes)
            .unwrap_or_default()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = DashboardConfig::from_toml_str("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.dashboard.recent_limit, 10);
        assert_eq!(config.default_range(), TimeRange::Day);
        assert_eq!(config.display_zone(), DisplayZone::Local);
        assert_eq!(config.export.output_dir, PathBuf::from("exports"));
        assert_eq!((config.charts.width, config.charts.height), (800, 400));
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[server]
host = "127.0.0.1"
port = 9000

[dashboard]
recent_limit = 5
default_range = "7d"
utc_offset_minutes = 120

[export]
output_dir = "/tmp/parking"

[charts]
width = 640
height = 320
"#;
        let config = DashboardConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.dashboard.recent_limit, 5);
        assert_eq!(config.default_range(), TimeRange::Week);
        assert_eq!(config.display_zone(), DisplayZone::from_offset_minutes(120).unwrap());
        assert_eq!(config.charts.width, 640);
    }

    #[test]
    fn test_unknown_default_range_is_lenient() {
        let config = DashboardConfig::from_toml_str("[dashboard]\ndefault_range = \"2w\"").unwrap();
        assert_eq!(config.default_range(), TimeRange::Day);
    }

    #[test]
    fn test_zero_chart_size_rejected() {
        let err = DashboardConfig::from_toml_str("[charts]\nwidth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_out_of_range_offset_rejected() {
        let err =
            DashboardConfig::from_toml_str("[dashboard]\nutc_offset_minutes = 100000").unwrap_err();
        assert!(err.to_string().contains("utc_offset_minutes"));
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            DashboardConfig::from_toml_str("[server\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }
}
