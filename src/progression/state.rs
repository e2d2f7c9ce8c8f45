//! Progression aggregate and its transitions
//!
//! [`Progression`] holds one user's profile, quests, reflections, diary and
//! achievement state. Transitions are synchronous and in-memory; callers that
//! need durability go through [`crate::session::Session`].

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::achievements::{
    evaluate, merge_with_catalog, newly_unlocked, AchievementId, AchievementState, EvaluationInput,
};
use super::analytics::{self, Analytics};
use super::curve::{current_level_xp, resolve_level_up, xp_threshold_for_level};
use super::growth::{stat_deltas, StatDeltas};
use super::streaks::{completion_days, current_streak};
use crate::domain::{
    DiaryEntry, PersonalReflection, PlayerProfile, Quest, QuestDraft, QuestId, QuestPatch, Rank,
    StatKind,
};

/// Level at which custom attributes can be created
pub const CUSTOM_ATTRIBUTE_MIN_LEVEL: u32 = 10;

/// Starting value of a newly created custom attribute
pub const CUSTOM_ATTRIBUTE_START: u32 = 1;

/// Longest accepted custom attribute name
pub const CUSTOM_ATTRIBUTE_MAX_LEN: usize = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressionError {
    #[error("custom attributes unlock at level {required} (current level {level})")]
    AttributeLocked { level: u32, required: u32 },

    #[error("no skill points available")]
    NoSkillPoints,

    #[error("attribute name must be 1-{CUSTOM_ATTRIBUTE_MAX_LEN} characters")]
    InvalidAttributeName,

    #[error("attribute already exists: {0}")]
    DuplicateAttribute(String),
}

/// A level up event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelUp {
    pub old_level: u32,
    pub new_level: u32,
    pub new_rank: Rank,
}

/// Everything a single completion changed
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionOutcome {
    /// The quest as stored in the completed list
    pub quest: Quest,
    pub xp_gained: u32,
    pub deltas: StatDeltas,
    pub level_up: Option<LevelUp>,
    pub unlocked: Vec<AchievementId>,
    /// Next occurrence of a recurring quest, already added to the active list
    pub respawned: Option<Quest>,
}

/// One user's progression aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progression {
    pub player: PlayerProfile,
    /// Active quests
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub completed_quests: Vec<Quest>,
    /// Newest first
    #[serde(default)]
    pub reflections: Vec<PersonalReflection>,
    /// Newest first
    #[serde(default)]
    pub diary: Vec<DiaryEntry>,
    #[serde(default = "AchievementState::locked_catalog")]
    pub achievements: Vec<AchievementState>,
    #[serde(skip)]
    pub analytics: Analytics,
}

impl Default for Progression {
    fn default() -> Self {
        Self::new()
    }
}

impl Progression {
    /// Initial aggregate: level 1, base stats, empty histories, everything locked
    pub fn new() -> Self {
        Self {
            player: PlayerProfile::new(),
            quests: Vec::new(),
            completed_quests: Vec::new(),
            reflections: Vec::new(),
            diary: Vec::new(),
            achievements: AchievementState::locked_catalog(),
            analytics: Analytics::default(),
        }
    }

    /// Repair derived data after loading a stored or imported snapshot
    pub fn rehydrate(&mut self, now: DateTime<Utc>) {
        self.player.normalize();
        self.achievements = merge_with_catalog(std::mem::take(&mut self.achievements));
        for quest in &mut self.completed_quests {
            quest.completed = true;
        }
        self.refresh_overdue(now);
        self.refresh_analytics(now);
    }

    pub fn find_active(&self, id: &str) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    /// Resolve a full ID or a unique prefix against active and completed quests
    pub fn resolve_id(&self, prefix: &str) -> Option<QuestId> {
        if prefix.is_empty() {
            return None;
        }
        let mut matches = self
            .quests
            .iter()
            .chain(self.completed_quests.iter())
            .filter(|q| q.id.starts_with(prefix));
        let first = matches.next()?;
        if first.id == prefix || matches.next().is_none() {
            Some(first.id.clone())
        } else {
            None
        }
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.iter().filter(|a| a.unlocked).count()
    }

    /// Complete an active quest. Unknown or already completed IDs are a no-op.
    pub fn complete_quest(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Option<CompletionOutcome> {
        let Some(index) = self.quests.iter().position(|q| q.id == id && !q.completed) else {
            debug!("Ignoring completion of unknown or finished quest {}", id);
            return None;
        };
        let mut quest = self.quests.remove(index);

        let old_level = self.player.level;
        let new_total = self.player.total_xp.saturating_add(u64::from(quest.xp));
        let resolution = resolve_level_up(new_total, old_level);

        let deltas = stat_deltas(&quest, rng);
        deltas.apply(&mut self.player.stats);

        if resolution.leveled_up {
            // One point per completion, however many levels were gained
            self.player.skill_points += 1;
        }

        self.player.total_xp = new_total;
        self.player.level = resolution.new_level;
        self.player.rank = resolution.new_rank;
        self.player.next_level_xp = xp_threshold_for_level(resolution.new_level + 1);
        self.player.xp = current_level_xp(new_total, resolution.new_level);

        quest.completed = true;
        quest.completed_at = Some(now);
        quest.is_overdue = false;
        self.completed_quests.push(quest.clone());

        let respawned = quest.next_occurrence(uuid::Uuid::new_v4().to_string(), now);
        if let Some(next) = &respawned {
            self.quests.push(next.clone());
        }

        self.player.streak = current_streak(
            &completion_days(&self.completed_quests),
            now.date_naive(),
        );

        let unlocked = self.reevaluate(now);
        self.refresh_analytics(now);

        let level_up = resolution.leveled_up.then(|| LevelUp {
            old_level,
            new_level: resolution.new_level,
            new_rank: resolution.new_rank,
        });
        if let Some(up) = &level_up {
            info!(
                "Level up: {} -> {} (rank {})",
                up.old_level, up.new_level, up.new_rank
            );
        }

        Some(CompletionOutcome {
            xp_gained: quest.xp,
            quest,
            deltas,
            level_up,
            unlocked,
            respawned,
        })
    }

    /// Add new active quests; returns their IDs in order
    pub fn add_quests(&mut self, drafts: Vec<QuestDraft>, now: DateTime<Utc>) -> Vec<QuestId> {
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let id = uuid::Uuid::new_v4().to_string();
            self.quests.push(Quest::from_draft(draft, id.clone(), now));
            ids.push(id);
        }
        debug!("Added {} quests", ids.len());
        ids
    }

    /// Delete an active quest. Completed quests cannot be deleted.
    pub fn delete_quest(&mut self, id: &str) -> Option<Quest> {
        let index = self.quests.iter().position(|q| q.id == id)?;
        Some(self.quests.remove(index))
    }

    /// Edit an active quest; returns the updated quest
    pub fn edit_quest(&mut self, id: &str, patch: QuestPatch, now: DateTime<Utc>) -> Option<Quest> {
        let quest = self.quests.iter_mut().find(|q| q.id == id)?;
        if let Some(title) = patch.title {
            quest.title = title;
        }
        if let Some(description) = patch.description {
            quest.description = description;
        }
        if let Some(due) = patch.due_date {
            quest.due_date = Some(due);
        }
        quest.refresh_overdue(now);
        Some(quest.clone())
    }

    /// Record a reflection (newest first); returns achievements it unlocked
    pub fn set_reflection(
        &mut self,
        mut reflection: PersonalReflection,
        now: DateTime<Utc>,
    ) -> Vec<AchievementId> {
        reflection.timestamp = now;
        self.reflections.insert(0, reflection);
        let unlocked = self.reevaluate(now);
        self.refresh_analytics(now);
        unlocked
    }

    pub fn add_diary_entry(
        &mut self,
        content: impl Into<String>,
        mood: Option<String>,
        now: DateTime<Utc>,
    ) -> &DiaryEntry {
        let entry = DiaryEntry {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            mood,
            created_at: now,
        };
        self.diary.insert(0, entry);
        &self.diary[0]
    }

    /// Spend a skill point on a new user-named attribute
    pub fn create_custom_attribute(&mut self, name: &str) -> Result<(), ProgressionError> {
        let name = name.trim();
        if self.player.level < CUSTOM_ATTRIBUTE_MIN_LEVEL {
            return Err(ProgressionError::AttributeLocked {
                level: self.player.level,
                required: CUSTOM_ATTRIBUTE_MIN_LEVEL,
            });
        }
        if self.player.skill_points == 0 {
            return Err(ProgressionError::NoSkillPoints);
        }
        if name.is_empty() || name.chars().count() > CUSTOM_ATTRIBUTE_MAX_LEN {
            return Err(ProgressionError::InvalidAttributeName);
        }
        let taken = self
            .player
            .custom_attributes
            .keys()
            .any(|existing| existing.eq_ignore_ascii_case(name))
            || StatKind::ALL
                .iter()
                .any(|kind| kind.label().eq_ignore_ascii_case(name));
        if taken {
            return Err(ProgressionError::DuplicateAttribute(name.to_string()));
        }

        self.player.skill_points -= 1;
        self.player
            .custom_attributes
            .insert(name.to_string(), CUSTOM_ATTRIBUTE_START);
        info!("Created custom attribute '{}'", name);
        Ok(())
    }

    pub fn refresh_overdue(&mut self, now: DateTime<Utc>) {
        for quest in &mut self.quests {
            quest.refresh_overdue(now);
        }
    }

    /// Full wipe back to the initial aggregate
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn reevaluate(&mut self, now: DateTime<Utc>) -> Vec<AchievementId> {
        let input = EvaluationInput {
            player: &self.player,
            completed: &self.completed_quests,
            reflections: self.reflections.len(),
        };
        let updated = evaluate(&input, &self.achievements, now);
        let unlocked = newly_unlocked(&self.achievements, &updated);
        for id in &unlocked {
            info!("Achievement unlocked: {}", id.as_str());
        }
        self.achievements = updated;
        unlocked
    }

    fn refresh_analytics(&mut self, now: DateTime<Utc>) {
        self.analytics = analytics::compute(&self.completed_quests, &self.reflections, now);
    }
}
