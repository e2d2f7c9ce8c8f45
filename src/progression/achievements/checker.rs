//! Achievement checking logic
//!
//! One pass over the catalog. Locked entries whose requirement holds are
//! unlocked; unlocked entries are never modified.

use chrono::{DateTime, Utc};

use super::definitions::{Achievement, AchievementId, AchievementState, Requirement};
use crate::domain::{PlayerProfile, Quest};

/// Everything a requirement may look at
#[derive(Debug, Clone, Copy)]
pub struct EvaluationInput<'a> {
    pub player: &'a PlayerProfile,
    pub completed: &'a [Quest],
    pub reflections: usize,
}

/// Current value measured against a requirement's target
pub fn progress(requirement: &Requirement, input: &EvaluationInput<'_>) -> u64 {
    match requirement {
        Requirement::Level(_) => u64::from(input.player.level),
        Requirement::QuestsCompleted(_) => input.completed.len() as u64,
        Requirement::Streak(_) => u64::from(input.player.streak),
        Requirement::StatThreshold { stat, .. } => u64::from(input.player.stats.get(*stat)),
        Requirement::TotalXp(_) => input.player.total_xp,
        Requirement::RealmQuests { realm, .. } => {
            input.completed.iter().filter(|q| q.realm == *realm).count() as u64
        }
        Requirement::Reflections(_) => input.reflections as u64,
    }
}

pub fn requirement_met(requirement: &Requirement, input: &EvaluationInput<'_>) -> bool {
    progress(requirement, input) >= requirement.target()
}

/// Re-evaluate every locked achievement; returns the updated states
pub fn evaluate(
    input: &EvaluationInput<'_>,
    achievements: &[AchievementState],
    now: DateTime<Utc>,
) -> Vec<AchievementState> {
    achievements
        .iter()
        .map(|state| {
            if state.unlocked {
                return state.clone();
            }
            let Some(def) = Achievement::get(state.id) else {
                return state.clone();
            };
            if requirement_met(&def.requirement, input) {
                AchievementState {
                    id: state.id,
                    unlocked: true,
                    unlocked_at: Some(now),
                }
            } else {
                state.clone()
            }
        })
        .collect()
}

/// IDs that are unlocked in `after` but were not in `before`
pub fn newly_unlocked(
    before: &[AchievementState],
    after: &[AchievementState],
) -> Vec<AchievementId> {
    after
        .iter()
        .filter(|a| a.unlocked)
        .filter(|a| !before.iter().any(|b| b.id == a.id && b.unlocked))
        .map(|a| a.id)
        .collect()
}
