//! Configuration loading and database path resolution
//!
//! Bootstrap configuration comes from an optional TOML file. A missing file
//! is not fatal: a warning is logged and built-in defaults are used.
//!
//! Database path priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`FITPLAN_DATABASE`)
//! 3. TOML config file (`database_path`)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the database location
pub const DATABASE_ENV_VAR: &str = "FITPLAN_DATABASE";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Path to SQLite database file (relative or absolute)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Report output configuration (optional)
    #[serde(default)]
    pub report: ReportConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Report output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for rendered QA reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

impl std::str::FromStr for ReportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(Error::Config(format!("Unknown report format: {}", other))),
        }
    }
}

/// Where the loaded configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// File does not exist; defaults in effect
    Missing(PathBuf),
    /// No platform config directory; defaults in effect
    NoConfigDir,
}

impl ConfigSource {
    pub fn uses_defaults(&self) -> bool {
        !matches!(self, Self::File(_))
    }

    /// Human-readable log line for this source
    pub fn message(&self) -> String {
        match self {
            Self::File(path) => format!("Loaded configuration from {}", path.display()),
            Self::Missing(path) => {
                format!("Config file not found: {}, using defaults", path.display())
            }
            Self::NoConfigDir => "Could not determine config directory, using defaults".to_string(),
        }
    }

    /// Emit [`Self::message`] at info, or at warn when defaults are in effect
    ///
    /// Call after the tracing subscriber is installed.
    pub fn log(&self) {
        if self.uses_defaults() {
            warn!("{}", self.message());
        } else {
            info!("{}", self.message());
        }
    }
}

/// Load the TOML configuration and report where it came from
///
/// With `path = None` the platform default location is tried. A file that
/// does not exist yields defaults with [`ConfigSource::Missing`]; a file that
/// exists but cannot be parsed is an error. Nothing is logged here, so the
/// caller can load configuration before its subscriber exists.
pub fn load_toml_config_with_source(path: Option<&Path>) -> Result<(TomlConfig, ConfigSource)> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => match default_config_path() {
            Some(p) => p,
            None => return Ok((TomlConfig::default(), ConfigSource::NoConfigDir)),
        },
    };

    if !config_path.exists() {
        return Ok((TomlConfig::default(), ConfigSource::Missing(config_path)));
    }

    let content = std::fs::read_to_string(&config_path)?;
    let config: TomlConfig = toml::from_str(&content).map_err(|e| {
        Error::Config(format!(
            "Failed to parse {}: {}",
            config_path.display(),
            e
        ))
    })?;

    Ok((config, ConfigSource::File(config_path)))
}

/// Load the TOML configuration, logging the source
///
/// A file that does not exist yields defaults plus a warning.
pub fn load_toml_config(path: Option<&Path>) -> Result<TomlConfig> {
    let (config, source) = load_toml_config_with_source(path)?;
    source.log();
    Ok(config)
}

/// Resolve the database path following the priority order above
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database_path {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_database_path()
}

/// Default configuration file path: `<config_dir>/fitplan/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("fitplan").join("config.toml"))
}

/// OS-dependent default database location
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fitplan"))
        .unwrap_or_else(|| PathBuf::from("./fitplan_data"))
        .join("fitplan.db")
}
