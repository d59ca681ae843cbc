//! TOML configuration for the fixture tool.
//!
//! Every field is optional; a missing file or missing key falls back to the
//! defaults below.  Example:
//!
//! ```toml
//! fixture_dir = "crates/dybuf-core/tests/fixtures/v1"
//! files = ["varint_unsigned", "typdex"]
//! log_level = "debug"
//! ```
//!
//! Command-line flags override whatever the file says.

use std::path::{Path, PathBuf};

use dybuf_core::conformance::FixtureKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureToolConfig {
    /// Directory holding the fixture JSON files.
    #[serde(default = "default_fixture_dir")]
    pub fixture_dir: PathBuf,
    /// Fixture files to generate or verify.
    #[serde(default = "default_files")]
    pub files: Vec<FixtureKind>,
    /// `tracing` level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_fixture_dir() -> PathBuf {
    PathBuf::from("crates/dybuf-core/tests/fixtures/v1")
}
fn default_files() -> Vec<FixtureKind> {
    FixtureKind::ALL.to_vec()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for FixtureToolConfig {
    fn default() -> Self {
        Self {
            fixture_dir: default_fixture_dir(),
            files: default_files(),
            log_level: default_log_level(),
        }
    }
}

// ── Load / save ───────────────────────────────────────────────────────────────

/// Loads the config at `path`, returning the defaults if the file does not
/// exist.
///
/// # Errors
///
/// [`ConfigError::Io`] for file-system errors other than "not found",
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<FixtureToolConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FixtureToolConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
pub fn save_config(path: &Path, config: &FixtureToolConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, FixtureToolConfig::default());
        assert_eq!(cfg.files.len(), 5);
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dybuf.toml");
        std::fs::write(&path, "files = [\"typdex\", \"varlen_strings\"]\n").unwrap();

        // Act
        let cfg = load_config(&path).unwrap();

        // Assert
        assert_eq!(cfg.files, vec![FixtureKind::Typdex, FixtureKind::VarlenStrings]);
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.fixture_dir, default_fixture_dir());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("dybuf.toml");
        let cfg = FixtureToolConfig {
            fixture_dir: PathBuf::from("/tmp/fixtures"),
            files: vec![FixtureKind::VarintSigned],
            log_level: "debug".to_string(),
        };

        save_config(&path, &cfg).unwrap();

        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_unknown_fixture_name_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dybuf.toml");
        std::fs::write(&path, "files = [\"varint_weird\"]\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }
}
