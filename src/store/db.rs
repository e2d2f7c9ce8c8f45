//! SQLite database connection and schema management
//!
//! Manages the `~/.questline/progress.db` database with automatic schema migration.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use rusqlite::Connection;

use crate::config::Config;

/// Latest schema version written by [`ProgressDb::init_schema`]
pub const SCHEMA_VERSION: i32 = 4;

/// Shared handle to the progress database
#[derive(Clone)]
pub struct ProgressDb {
    conn: Arc<Mutex<Connection>>,
}

impl ProgressDb {
    /// Open or create the database at the default location (~/.questline/progress.db)
    pub fn open_default() -> Result<Self> {
        let db_path = Config::global_config_dir().join("progress.db");
        Self::open(&db_path)
    }

    /// Open or create the database at a specific path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data dir: {}", parent.display()))?;
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open progress db: {}", path.display()))?;

        // WAL so a second device syncing the same file does not block readers
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory db")?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Lock the connection. A poisoned lock still holds a usable connection.
    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn schema_version(&self) -> Result<i32> {
        let conn = self.conn();
        let version = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )?;
        Ok(version)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to create progress schema")?;
        drop(conn);
        self.run_migrations()?;
        Ok(())
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn();

        let version: i32 = conn
            .query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))
            .unwrap_or(0);

        // Migration 2: recurring quests
        if version < 2 {
            let has_recurring: bool = conn
                .prepare("SELECT COUNT(*) FROM pragma_table_info('quests') WHERE name = 'recurring'")
                .and_then(|mut s| s.query_row([], |r| r.get::<_, i32>(0)))
                .map(|c| c > 0)
                .unwrap_or(false);

            if !has_recurring {
                conn.execute_batch("ALTER TABLE quests ADD COLUMN recurring TEXT;")?;
            }
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (2)", [])?;
        }

        // Migration 3: diary
        if version < 3 {
            conn.execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS diary_entries (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    content TEXT NOT NULL,
                    mood TEXT,
                    created_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_diary_user ON diary_entries(user_id, created_at);
                "#,
            )?;
            conn.execute("INSERT OR REPLACE INTO schema_version VALUES (3)", [])?;
        }

        // Migration 4: quest and diary ids are unique per user, not globally
        if version < 4 {
            conn.execute_batch(MIGRATION_4_SQL)
                .context("Failed to re-key quests and diary entries")?;
        }

        Ok(())
    }
}

/// Rebuild `quests` and `diary_entries` with `(user_id, id)` keys, keeping row order
const MIGRATION_4_SQL: &str = r#"
BEGIN;

CREATE TABLE quests_v4 (
    id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    quest_type TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    xp INTEGER NOT NULL,
    realm TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    completed_at TEXT,
    due_date TEXT,
    stat_boosts TEXT NOT NULL DEFAULT '{}',
    is_overdue INTEGER NOT NULL DEFAULT 0,
    recurring TEXT,
    PRIMARY KEY (user_id, id)
);
INSERT INTO quests_v4 (
    id, user_id, title, description, quest_type, difficulty, xp, realm, completed,
    created_at, completed_at, due_date, stat_boosts, is_overdue, recurring
)
SELECT
    id, user_id, title, description, quest_type, difficulty, xp, realm, completed,
    created_at, completed_at, due_date, stat_boosts, is_overdue, recurring
FROM quests ORDER BY rowid;
DROP TABLE quests;
ALTER TABLE quests_v4 RENAME TO quests;
CREATE INDEX IF NOT EXISTS idx_quest_user ON quests(user_id, completed);

CREATE TABLE diary_entries_v4 (
    id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    content TEXT NOT NULL,
    mood TEXT,
    created_at TEXT NOT NULL,
    PRIMARY KEY (user_id, id)
);
INSERT INTO diary_entries_v4 (id, user_id, content, mood, created_at)
SELECT id, user_id, content, mood, created_at FROM diary_entries ORDER BY rowid;
DROP TABLE diary_entries;
ALTER TABLE diary_entries_v4 RENAME TO diary_entries;
CREATE INDEX IF NOT EXISTS idx_diary_user ON diary_entries(user_id, created_at);

INSERT OR REPLACE INTO schema_version VALUES (4);
COMMIT;
"#;

/// Base schema (version 1). Later tables and columns come from migrations.
/// Timestamps are RFC 3339 text so they round-trip at full precision.
const SCHEMA_SQL: &str = r#"
-- One row per user
CREATE TABLE IF NOT EXISTS profiles (
    user_id TEXT PRIMARY KEY,
    level INTEGER NOT NULL DEFAULT 1,
    rank TEXT NOT NULL DEFAULT 'E',
    xp INTEGER NOT NULL DEFAULT 0,
    total_xp INTEGER NOT NULL DEFAULT 0,
    next_level_xp INTEGER NOT NULL DEFAULT 100,
    streak INTEGER NOT NULL DEFAULT 0,
    skill_points INTEGER NOT NULL DEFAULT 0,
    stats TEXT NOT NULL,
    custom_attributes TEXT NOT NULL DEFAULT '{}',
    updated_at INTEGER NOT NULL
);

-- Active and completed quests
CREATE TABLE IF NOT EXISTS quests (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    title TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    quest_type TEXT NOT NULL,
    difficulty TEXT NOT NULL,
    xp INTEGER NOT NULL,
    realm TEXT NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    completed_at TEXT,
    due_date TEXT,
    stat_boosts TEXT NOT NULL DEFAULT '{}',
    is_overdue INTEGER NOT NULL DEFAULT 0
);
CREATE INDEX IF NOT EXISTS idx_quest_user ON quests(user_id, completed);

-- Reflection history
CREATE TABLE IF NOT EXISTS reflections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    mood TEXT NOT NULL,
    emotional_state TEXT NOT NULL,
    current_challenges TEXT NOT NULL,
    motivation_level INTEGER NOT NULL,
    notes TEXT,
    timestamp TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_reflection_user ON reflections(user_id, timestamp);

-- Achievement flags per user
CREATE TABLE IF NOT EXISTS achievements (
    user_id TEXT NOT NULL,
    id TEXT NOT NULL,
    unlocked INTEGER NOT NULL DEFAULT 0,
    unlocked_at TEXT,
    PRIMARY KEY (user_id, id)
);

-- Schema version
CREATE TABLE IF NOT EXISTS schema_version (version INTEGER PRIMARY KEY);
INSERT OR IGNORE INTO schema_version VALUES (1);
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn table_names(db: &ProgressDb) -> Vec<String> {
        let conn = db.conn();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table'")
            .unwrap();
        let names: Vec<String> = stmt
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();
        names
    }

    #[test]
    fn test_open_and_init() {
        let dir = tempdir().unwrap();
        let db = ProgressDb::open(&dir.path().join("nested").join("progress.db")).unwrap();

        let tables = table_names(&db);
        for table in ["profiles", "quests", "reflections", "achievements", "diary_entries"] {
            assert!(tables.contains(&table.to_string()), "missing {}", table);
        }
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("progress.db");
        drop(ProgressDb::open(&path).unwrap());
        let db = ProgressDb::open(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrates_version_one_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA_SQL).unwrap();
        }

        let db = ProgressDb::open(&path).unwrap();
        let conn = db.conn();
        let has_recurring: i32 = conn
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('quests') WHERE name = 'recurring'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(has_recurring, 1);
    }

    #[test]
    fn test_same_ids_for_different_users() {
        let db = ProgressDb::open_in_memory().unwrap();
        let conn = db.conn();
        for user in ["alice", "bob"] {
            conn.execute(
                "INSERT INTO quests (id, user_id, title, quest_type, difficulty, xp, realm, created_at) \
                 VALUES ('q1', ?1, 'Read', 'Daily', 'Easy', 10, 'Mind & Skill', '2026-01-01T00:00:00Z')",
                [user],
            )
            .unwrap();
            conn.execute(
                "INSERT INTO diary_entries (id, user_id, content, created_at) \
                 VALUES ('d1', ?1, 'hello', '2026-01-01T00:00:00Z')",
                [user],
            )
            .unwrap();
        }
        let quests: i32 = conn
            .query_row("SELECT COUNT(*) FROM quests WHERE id = 'q1'", [], |r| r.get(0))
            .unwrap();
        let entries: i32 = conn
            .query_row("SELECT COUNT(*) FROM diary_entries WHERE id = 'd1'", [], |r| r.get(0))
            .unwrap();
        assert_eq!((quests, entries), (2, 2));
    }

    #[test]
    fn test_version_three_rows_survive_rekey() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v3.db");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(SCHEMA_SQL).unwrap();
            conn.execute_batch(
                r#"
                ALTER TABLE quests ADD COLUMN recurring TEXT;
                CREATE TABLE diary_entries (
                    id TEXT PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    content TEXT NOT NULL,
                    mood TEXT,
                    created_at TEXT NOT NULL
                );
                INSERT INTO schema_version VALUES (2);
                INSERT INTO schema_version VALUES (3);
                INSERT INTO quests (id, user_id, title, quest_type, difficulty, xp, realm, created_at, recurring)
                    VALUES ('q1', 'alice', 'Stretch', 'Daily', 'Easy', 10, 'Body & Discipline', '2026-01-01T00:00:00Z', 'daily');
                INSERT INTO diary_entries (id, user_id, content, created_at)
                    VALUES ('d1', 'alice', 'kept', '2026-01-01T00:00:00Z');
                "#,
            )
            .unwrap();
        }

        let db = ProgressDb::open(&path).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        let conn = db.conn();
        let recurring: Option<String> = conn
            .query_row("SELECT recurring FROM quests WHERE user_id = 'alice' AND id = 'q1'", [], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(recurring.as_deref(), Some("daily"));
        let content: String = conn
            .query_row("SELECT content FROM diary_entries WHERE user_id = 'alice'", [], |r| r.get(0))
            .unwrap();
        assert_eq!(content, "kept");
    }
}
