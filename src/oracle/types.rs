//! Request and response shapes exchanged with the quest oracle

use serde::{Deserialize, Serialize};

use crate::domain::{PersonalReflection, PlayerProfile, QuestDraft};
use crate::progression::Progression;

/// Most recent diary texts sent along with a quest request
pub const MAX_DIARY_CONTEXT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestRequest {
    pub player: PlayerProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reflection: Option<PersonalReflection>,
    /// Newest first
    pub recent_diary: Vec<String>,
}

impl QuestRequest {
    /// Snapshot the player, latest reflection and recent diary entries
    pub fn from_state(state: &Progression) -> Self {
        Self {
            player: state.player.clone(),
            reflection: state.reflections.first().cloned(),
            recent_diary: state
                .diary
                .iter()
                .take(MAX_DIARY_CONTEXT)
                .map(|entry| entry.content.clone())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestions {
    #[serde(default)]
    pub focus_area: String,
    #[serde(default)]
    pub motivation: String,
    #[serde(default)]
    pub emotional_guidance: String,
}

/// Generated quests plus free-text guidance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestPlan {
    #[serde(default)]
    pub quests: Vec<QuestDraft>,
    #[serde(default)]
    pub suggestions: Suggestions,
}
