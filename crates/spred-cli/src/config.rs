//! Configuration for the spred CLI.
//! Read from `<config dir>/spred/config.toml` unless `--config` names a file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use spred_core::Tolerances;
use std::path::{Path, PathBuf};

/// Main spred configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpredConfig {
    /// Classification thresholds used when a netlist has none of its own
    #[serde(default)]
    pub solver: Tolerances,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
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

impl LoggingConfig {
    /// Parsed level, falling back to INFO for unrecognised names.
    pub fn level(&self) -> tracing::Level {
        self.level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// Load the configuration.
///
/// An explicit path must exist. The default location is optional: a missing
/// file there yields the defaults.
pub fn load_spred_config(path: Option<&Path>) -> Result<SpredConfig> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => match spred_config_path() {
            Some(path) if path.exists() => path,
            _ => return Ok(SpredConfig::default()),
        },
    };

    let contents = std::fs::read_to_string(&config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let config: SpredConfig = toml::from_str(&contents)
        .with_context(|| format!("parsing config {}", config_path.display()))?;
    Ok(config)
}

/// Get the path to the default configuration file
/// Location: <config dir>/spred/config.toml
pub fn spred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("spred").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_spred_config_path_ends_with_config_toml() {
        if let Some(path) = spred_config_path() {
            assert!(path.ends_with("spred/config.toml"));
        }
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: SpredConfig = toml::from_str("[solver]\nwire_epsilon = 1e-3\n").unwrap();
        assert_eq!(config.solver.wire_epsilon, 1e-3);
        assert_eq!(
            config.solver.source_epsilon,
            Tolerances::default().source_epsilon
        );
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_logging_level_parses() {
        let config = LoggingConfig {
            level: "debug".to_string(),
        };
        assert_eq!(config.level(), tracing::Level::DEBUG);
        let config = LoggingConfig {
            level: "chatty".to_string(),
        };
        assert_eq!(config.level(), tracing::Level::INFO);
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"warn\"").unwrap();
        let config = load_spred_config(Some(file.path())).unwrap();
        assert_eq!(config.logging.level(), tracing::Level::WARN);
        assert_eq!(config.solver, Tolerances::default());
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(load_spred_config(Some(&missing)).is_err());
    }
}
