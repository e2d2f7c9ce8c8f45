//! Achievements: fixed catalog plus a monotonic evaluator

mod checker;
mod definitions;

pub use checker::{evaluate, newly_unlocked, progress, requirement_met, EvaluationInput};
pub use definitions::{
    merge_with_catalog, Achievement, AchievementId, AchievementState, Requirement, ACHIEVEMENTS,
};
