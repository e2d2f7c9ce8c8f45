//! Shared test utilities for progression integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use questline::domain::{Difficulty, QuestDraft, QuestType, Realm};
use questline::session::Session;
use questline::store::SqliteStore;

/// A temporary directory holding one progress database
pub struct TestDb {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestDb {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("progress.db");
        Self { dir, path }
    }

    pub fn store(&self) -> SqliteStore {
        SqliteStore::open(&self.path).expect("Failed to open progress db")
    }

    /// Open a session for `user` at the fixed test clock
    pub fn session(&self, user: &str) -> Session<SqliteStore> {
        Session::open(self.store(), user, clock(0)).expect("Failed to open session")
    }
}

/// Fixed clock: 2026-03-02 09:00 UTC plus `days`
pub fn clock(days: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap() + chrono::Duration::days(days)
}

pub fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

pub fn draft(title: &str, difficulty: Difficulty, realm: Realm) -> QuestDraft {
    QuestDraft::new(title, QuestType::Daily, difficulty, realm)
}
