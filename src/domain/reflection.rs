//! Reflections and diary entries
//!
//! Free-text emotional snapshots. They feed the quest oracle and the
//! analytics views; leveling arithmetic never reads them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest and highest accepted motivation level
pub const MOTIVATION_RANGE: std::ops::RangeInclusive<u8> = 1..=10;

/// Result of the emotional-analysis collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalAnalysis {
    pub mood: String,
    pub emotional_state: String,
    pub current_challenges: String,
    pub motivation_level: u8,
}

/// A user's emotional-state snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalReflection {
    pub mood: String,
    pub emotional_state: String,
    pub current_challenges: String,
    pub motivation_level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl PersonalReflection {
    pub fn from_analysis(
        analysis: EmotionalAnalysis,
        notes: Option<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            mood: analysis.mood,
            emotional_state: analysis.emotional_state,
            current_challenges: analysis.current_challenges,
            motivation_level: analysis
                .motivation_level
                .clamp(*MOTIVATION_RANGE.start(), *MOTIVATION_RANGE.end()),
            notes,
            timestamp,
        }
    }
}

/// Free-form journal entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motivation_is_clamped() {
        let analysis = EmotionalAnalysis {
            mood: "restless".into(),
            emotional_state: "anxious but hopeful".into(),
            current_challenges: "sleep".into(),
            motivation_level: 42,
        };
        let reflection = PersonalReflection::from_analysis(analysis, None, Utc::now());
        assert_eq!(reflection.motivation_level, 10);
    }
}
