//! Core domain types

mod player;
mod quest;
mod reflection;
mod stats;

pub use player::{PlayerProfile, Rank};
pub use quest::{Difficulty, Quest, QuestDraft, QuestId, QuestPatch, QuestType, Realm, Recurrence};
pub use reflection::{DiaryEntry, EmotionalAnalysis, PersonalReflection, MOTIVATION_RANGE};
pub use stats::{StatKind, Stats, BASE_STAT_VALUE, TIER_WIDTH};
