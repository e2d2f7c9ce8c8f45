//! Application session: one user's aggregate bound to a store
//!
//! Every mutation is write-ahead. The transition runs on a copy of the
//! aggregate, the copy is persisted, and only then does it replace the
//! in-memory state. A failed write leaves memory exactly as it was.

use chrono::{DateTime, Utc};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{DiaryEntry, PersonalReflection, Quest, QuestDraft, QuestId, QuestPatch};
use crate::progression::{AchievementId, CompletionOutcome, Progression, ProgressionError};
use crate::store::{CompletionRecord, Persistence, StoreError};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to persist {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

pub struct Session<P: Persistence> {
    user_id: String,
    state: Progression,
    store: P,
}

impl<P: Persistence> Session<P> {
    /// Load a user's progress, or register a fresh profile if none is stored
    pub fn open(store: P, user_id: impl Into<String>, now: DateTime<Utc>) -> Result<Self, SessionError> {
        let user_id = user_id.into();
        let loaded = store.load_all(&user_id).map_err(persistence("load"))?;

        let state = match loaded {
            Some(mut state) => {
                state.rehydrate(now);
                debug!("Opened session for {} at level {}", user_id, state.player.level);
                state
            }
            None => {
                let mut state = Progression::new();
                state.rehydrate(now);
                store
                    .save_profile(&user_id, &state.player)
                    .and_then(|_| store.save_achievements(&user_id, &state.achievements))
                    .map_err(persistence("register"))?;
                info!("Registered new player {}", user_id);
                state
            }
        };

        Ok(Self {
            user_id,
            state,
            store,
        })
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &Progression {
        &self.state
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    /// Complete a quest. `Ok(None)` for unknown or already completed IDs.
    pub fn complete_quest(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<Option<CompletionOutcome>, SessionError> {
        let mut next = self.state.clone();
        let Some(outcome) = next.complete_quest(id, now, rng) else {
            return Ok(None);
        };

        let record = CompletionRecord {
            quest: &outcome.quest,
            respawned: outcome.respawned.as_ref(),
            profile: &next.player,
            achievements: &next.achievements,
        };
        self.store
            .complete_quest_transactionally(&self.user_id, record)
            .map_err(persistence("quest completion"))?;

        self.state = next;
        info!("Completed quest '{}' (+{} XP)", outcome.quest.title, outcome.xp_gained);
        Ok(Some(outcome))
    }

    pub fn add_quests(
        &mut self,
        drafts: Vec<QuestDraft>,
        now: DateTime<Utc>,
    ) -> Result<Vec<QuestId>, SessionError> {
        let mut next = self.state.clone();
        let ids = next.add_quests(drafts, now);
        let added: Vec<Quest> = next
            .quests
            .iter()
            .filter(|q| ids.contains(&q.id))
            .cloned()
            .collect();

        self.commit("new quests", next, |store, user| store.save_quests(user, &added))?;
        Ok(ids)
    }

    pub fn delete_quest(&mut self, id: &str) -> Result<Option<Quest>, SessionError> {
        let mut next = self.state.clone();
        let Some(removed) = next.delete_quest(id) else {
            return Ok(None);
        };
        self.commit("quest deletion", next, |store, user| store.delete_quest(user, id))?;
        Ok(Some(removed))
    }

    pub fn edit_quest(
        &mut self,
        id: &str,
        patch: QuestPatch,
        now: DateTime<Utc>,
    ) -> Result<Option<Quest>, SessionError> {
        let mut next = self.state.clone();
        let Some(edited) = next.edit_quest(id, patch, now) else {
            return Ok(None);
        };
        self.commit("quest edit", next, |store, user| store.save_quest(user, &edited))?;
        Ok(Some(edited))
    }

    pub fn set_reflection(
        &mut self,
        reflection: PersonalReflection,
        now: DateTime<Utc>,
    ) -> Result<Vec<AchievementId>, SessionError> {
        let mut next = self.state.clone();
        let unlocked = next.set_reflection(reflection, now);
        let saved = next.reflections[0].clone();
        let achievements = next.achievements.clone();
        let unlocked_any = !unlocked.is_empty();

        self.commit("reflection", next, |store, user| {
            store.save_reflection(user, &saved)?;
            if unlocked_any {
                store.save_achievements(user, &achievements)?;
            }
            Ok(())
        })?;
        Ok(unlocked)
    }

    pub fn add_diary_entry(
        &mut self,
        content: impl Into<String>,
        mood: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<DiaryEntry, SessionError> {
        let mut next = self.state.clone();
        let entry = next.add_diary_entry(content, mood, now).clone();
        self.commit("diary entry", next, |store, user| store.save_diary_entry(user, &entry))?;
        Ok(entry)
    }

    pub fn create_custom_attribute(&mut self, name: &str) -> Result<(), SessionError> {
        let mut next = self.state.clone();
        next.create_custom_attribute(name)?;
        let profile = next.player.clone();
        self.commit("custom attribute", next, |store, user| store.save_profile(user, &profile))
    }

    /// Recompute overdue flags. Derived data, so nothing is written.
    pub fn refresh_overdue(&mut self, now: DateTime<Utc>) {
        self.state.refresh_overdue(now);
    }

    /// Wipe the user's progress in storage and memory
    pub fn reset(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        let mut next = Progression::new();
        next.rehydrate(now);
        let player = next.player.clone();
        let achievements = next.achievements.clone();
        self.commit("reset", next, |store, user| {
            store.reset(user)?;
            store.save_profile(user, &player)?;
            store.save_achievements(user, &achievements)
        })?;
        info!("Reset progress for {}", self.user_id);
        Ok(())
    }

    /// Replace everything with an imported snapshot
    pub fn import(&mut self, mut snapshot: Progression, now: DateTime<Utc>) -> Result<(), SessionError> {
        snapshot.rehydrate(now);
        let copy = snapshot.clone();
        self.commit("import", snapshot, |store, user| store.replace_all(user, &copy))
    }

    fn commit(
        &mut self,
        operation: &'static str,
        next: Progression,
        write: impl FnOnce(&P, &str) -> Result<(), StoreError>,
    ) -> Result<(), SessionError> {
        write(&self.store, &self.user_id).map_err(persistence(operation))?;
        self.state = next;
        debug!("Committed {} for {}", operation, self.user_id);
        Ok(())
    }
}

fn persistence(operation: &'static str) -> impl FnOnce(StoreError) -> SessionError {
    move |source| {
        warn!("[questline:store] {} failed: {}", operation, source);
        SessionError::Persistence { operation, source }
    }
}
