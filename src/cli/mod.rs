//! CLI command implementations

pub mod achievements;
pub mod generate;
pub mod init;
pub mod journal;
pub mod quest;
pub mod snapshot;
pub mod status;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use questline::config::Config;
use questline::domain::QuestId;
use questline::progression::Progression;
use questline::session::Session;
use questline::store::SqliteStore;

/// The `--config` path, or the global config file
pub fn config_file(config_path: Option<PathBuf>) -> PathBuf {
    config_path.unwrap_or_else(Config::global_config_path)
}

/// Loaded configuration
pub struct AppContext {
    pub config: Config,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let config = Config::load(Some(&config_file(config_path)))?;
        Ok(Self { config })
    }

    /// Open the configured database and the configured player's session
    pub fn open_session(&self) -> Result<Session<SqliteStore>> {
        let db_path = self.config.db_path();
        let store = SqliteStore::open(&db_path)?;
        let session = Session::open(store, self.config.player.user_id.clone(), Utc::now())
            .with_context(|| format!("Failed to load progress from {}", db_path.display()))?;
        Ok(session)
    }
}

/// Resolve a full quest ID or a unique prefix
pub fn resolve_quest_id(state: &Progression, prefix: &str) -> Result<QuestId> {
    match state.resolve_id(prefix.trim()) {
        Some(id) => Ok(id),
        None => bail!("No single quest matches '{}'", prefix),
    }
}

/// First 8 characters of an ID, for listings
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Text progress bar, `width` cells wide
pub fn progress_bar(fraction: f32, width: usize) -> String {
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_bounds() {
        assert_eq!(progress_bar(0.0, 4), "[----]");
        assert_eq!(progress_bar(0.5, 4), "[##--]");
        assert_eq!(progress_bar(3.0, 4), "[####]");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
