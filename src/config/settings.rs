//! Settings sections of `config.toml`

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Environment variable consulted when `[oracle] api_key` is empty
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// `[player]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSettings {
    /// Key under which progress is stored
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

fn default_user_id() -> String {
    "local".to_string()
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            user_id: default_user_id(),
        }
    }
}

/// `[storage]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Empty means `~/.questline/progress.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub db_path: Option<PathBuf>,
}

/// `[oracle]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OracleSettings {
    /// Gemini API key. Falls back to `GEMINI_API_KEY`.
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Attempts made when the endpoint answers 503
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before retry `n` is `retry_backoff_ms * n`
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl OracleSettings {
    /// Configured key, else the environment
    pub fn api_key(&self) -> Option<String> {
        self.resolve_api_key(|name| std::env::var(name).ok())
    }

    pub fn resolve_api_key(&self, lookup: impl Fn(&str) -> Option<String>) -> Option<String> {
        Some(self.api_key.trim().to_string())
            .filter(|key| !key.is_empty())
            .or_else(|| lookup(API_KEY_ENV).filter(|key| !key.trim().is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_key_wins_over_env() {
        let settings = OracleSettings {
            api_key: " from-file ".into(),
            ..OracleSettings::default()
        };
        let key = settings.resolve_api_key(|_| Some("from-env".into()));
        assert_eq!(key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_env_fallback() {
        let settings = OracleSettings::default();
        let key = settings.resolve_api_key(|name| (name == API_KEY_ENV).then(|| "env-key".into()));
        assert_eq!(key.as_deref(), Some("env-key"));
        assert_eq!(settings.resolve_api_key(|_| Some("   ".into())), None);
        assert_eq!(settings.resolve_api_key(|_| None), None);
    }
}
