//! Progression engine
//!
//! Leveling curve, stat growth, achievements, streaks and analytics, plus the
//! [`Progression`] aggregate that ties them together.

pub mod achievements;
pub mod analytics;
pub mod curve;
pub mod growth;
pub mod state;
pub mod streaks;

pub use achievements::{Achievement, AchievementId, AchievementState, ACHIEVEMENTS};
pub use analytics::Analytics;
pub use curve::{rank_for_level, resolve_level_up, LevelUpResolution, MAX_LEVEL};
pub use growth::{stat_deltas, StatDeltas};
pub use state::{
    CompletionOutcome, LevelUp, Progression, ProgressionError, CUSTOM_ATTRIBUTE_MIN_LEVEL,
};
