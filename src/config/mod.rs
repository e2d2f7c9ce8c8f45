//! Configuration loading and management

mod io;
mod settings;

pub use io::write_atomic;
pub use settings::{OracleSettings, PlayerSettings, StorageSettings, API_KEY_ENV};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Main configuration structure (`~/.questline/config.toml`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub player: PlayerSettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub oracle: OracleSettings,
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load `path`, or the global config. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::global_config_path);
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::from_file(&path)
    }

    /// Database file, honouring `[storage] db_path`
    pub fn db_path(&self) -> PathBuf {
        self.storage
            .db_path
            .clone()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Self::global_config_dir().join("progress.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_file_gets_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[player]\nuser_id = \"sung\"\n\n[oracle]\nmax_retries = 5\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.player.user_id, "sung");
        assert_eq!(config.oracle.max_retries, 5);
        assert_eq!(config.oracle.retry_backoff_ms, 1000);
        assert_eq!(config.storage, StorageSettings::default());
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[oracle\nmodel = ").unwrap();
        let err = Config::from_file(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_db_path_override() {
        let mut config = Config::default();
        assert!(config.db_path().ends_with("progress.db"));
        config.storage.db_path = Some(PathBuf::from("/tmp/elsewhere.db"));
        assert_eq!(config.db_path(), PathBuf::from("/tmp/elsewhere.db"));
    }
}
