//! Durable storage for progression state
//!
//! [`Persistence`] is the seam the session writes through. [`SqliteStore`]
//! is the only production implementation; it keeps every user in one
//! SQLite file (`~/.questline/progress.db`).
//!
//! # Usage
//!
//! ```ignore
//! let store = SqliteStore::open_default()?;
//! let state = store.load_all("local")?.unwrap_or_default();
//! ```

mod db;
mod sqlite;

pub use db::{ProgressDb, SCHEMA_VERSION};
pub use sqlite::SqliteStore;

use thiserror::Error;

use crate::domain::{DiaryEntry, PersonalReflection, PlayerProfile, Quest, QuestId};
use crate::progression::{AchievementState, Progression};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid JSON column: {0}")]
    Json(#[from] serde_json::Error),

    #[error("quest {0} is already completed in storage")]
    AlreadyCompleted(QuestId),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

/// Everything a quest completion writes, committed as one unit
#[derive(Debug, Clone, Copy)]
pub struct CompletionRecord<'a> {
    pub quest: &'a Quest,
    pub respawned: Option<&'a Quest>,
    pub profile: &'a PlayerProfile,
    pub achievements: &'a [AchievementState],
}

/// Storage backend for one or more users' progression
pub trait Persistence {
    /// Full snapshot for a user, or `None` if the user has never been saved
    fn load_all(&self, user_id: &str) -> Result<Option<Progression>, StoreError>;

    fn save_profile(&self, user_id: &str, profile: &PlayerProfile) -> Result<(), StoreError>;

    fn save_quest(&self, user_id: &str, quest: &Quest) -> Result<(), StoreError>;

    /// Save several quests. Backends with transactions should make this atomic.
    fn save_quests(&self, user_id: &str, quests: &[Quest]) -> Result<(), StoreError> {
        for quest in quests {
            self.save_quest(user_id, quest)?;
        }
        Ok(())
    }

    fn delete_quest(&self, user_id: &str, quest_id: &str) -> Result<(), StoreError>;

    fn save_reflection(
        &self,
        user_id: &str,
        reflection: &PersonalReflection,
    ) -> Result<(), StoreError>;

    fn save_diary_entry(&self, user_id: &str, entry: &DiaryEntry) -> Result<(), StoreError>;

    fn save_achievements(
        &self,
        user_id: &str,
        achievements: &[AchievementState],
    ) -> Result<(), StoreError>;

    /// Write the completed quest, its respawn, the profile and the
    /// achievement flags atomically. Fails with
    /// [`StoreError::AlreadyCompleted`] if another writer got there first.
    fn complete_quest_transactionally(
        &self,
        user_id: &str,
        record: CompletionRecord<'_>,
    ) -> Result<(), StoreError>;

    /// Remove every row belonging to a user
    fn reset(&self, user_id: &str) -> Result<(), StoreError>;

    /// Replace a user's rows with `state` (import)
    fn replace_all(&self, user_id: &str, state: &Progression) -> Result<(), StoreError>;
}
