//! Journal configuration — starting capital and canvas dimensions, from TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::curve::CanvasSpec;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Per-journal configuration. `starting_capital` is supplied externally,
/// never derived from the trade list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    pub starting_capital: f64,
    pub canvas: CanvasSpec,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            starting_capital: 100_000.0,
            canvas: CanvasSpec::default(),
        }
    }
}

impl JournalConfig {
    /// Load from a TOML file. A missing file yields defaults; a present but
    /// malformed file is an error (silent fallback would mask typos).
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let config = JournalConfig::load(Path::new("/nonexistent/tradelog.toml")).unwrap();
        assert_eq!(config, JournalConfig::default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: JournalConfig = toml::from_str("starting_capital = 250000.0").unwrap();
        assert_eq!(config.starting_capital, 250_000.0);
        assert_eq!(config.canvas, CanvasSpec::default());
    }

    #[test]
    fn full_toml_parses() {
        let config: JournalConfig = toml::from_str(
            r#"
            starting_capital = 50000.0

            [canvas]
            width = 400.0
            height = 200.0
            max_deviation = 80.0
            margin = 10.0
            "#,
        )
        .unwrap();
        assert_eq!(config.canvas.width, 400.0);
        assert_eq!(config.canvas.max_deviation, 80.0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = std::env::temp_dir().join("tradelog_config_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "starting_capital = [whoops").unwrap();
        assert!(matches!(
            JournalConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
