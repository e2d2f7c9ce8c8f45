//! Init command implementation

use std::path::Path;

use anyhow::{bail, Result};

use questline::config::write_atomic;

/// Default configuration content for `questline init`
pub const DEFAULT_CONFIG: &str = r#"# Questline configuration
# =======================
#
# Level up your life: quests, stats and achievements.

# ============================================================================
# PLAYER
# ============================================================================
#
#   user_id - Key under which your progress is stored (default: "local").
#             Point two devices at the same database with different ids to
#             keep separate profiles.

[player]
user_id = "local"

# ============================================================================
# STORAGE
# ============================================================================
#
#   db_path - SQLite database file (default: ~/.questline/progress.db)

[storage]
# db_path = "/path/to/progress.db"

# ============================================================================
# ORACLE - Gemini quest generation and emotional analysis
# ============================================================================
#
#   api_key          - Gemini API key. Leave empty to read GEMINI_API_KEY.
#                      Without a key, built-in quest suggestions are used.
#   model            - Model name (default: gemini-1.5-flash)
#   base_url         - API root (default: https://generativelanguage.googleapis.com)
#   max_retries      - Attempts when the API answers 503 (default: 3)
#   retry_backoff_ms - Delay before retry n is retry_backoff_ms * n (default: 1000)
#   timeout_secs     - Read timeout per request (default: 30)

[oracle]
api_key = ""
model = "gemini-1.5-flash"
base_url = "https://generativelanguage.googleapis.com"
max_retries = 3
retry_backoff_ms = 1000
timeout_secs = 30
"#;

/// Write the default config file
pub fn init_command(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    write_atomic(config_path, DEFAULT_CONFIG.as_bytes())?;
    println!("Created: {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use questline::config::Config;
    use tempfile::tempdir;

    #[test]
    fn test_default_config_parses_to_defaults() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        init_command(&path, false).unwrap();
        assert!(init_command(&path, false).is_err());
        init_command(&path, true).unwrap();
    }

    #[test]
    fn test_force_replaces_unreadable_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[player\nuser_id = ").unwrap();
        assert!(crate::cli::AppContext::load(Some(path.clone())).is_err());

        init_command(&path, true).unwrap();
        let ctx = crate::cli::AppContext::load(Some(path)).unwrap();
        assert_eq!(ctx.config, Config::default());
    }
}
