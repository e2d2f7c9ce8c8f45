//! Achievement definitions and metadata
//!
//! The catalog is fixed data. Per-player unlock state lives in
//! [`AchievementState`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Realm, StatKind};

/// Unique identifier for each achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstQuest,
    QuestVeteran,
    RisingHunter,
    EliteHunter,
    WeekStreak,
    Scholar,
    ThousandXp,
    MindExplorer,
    SelfAware,
}

impl AchievementId {
    /// Get the string ID for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstQuest => "first_quest",
            Self::QuestVeteran => "quest_veteran",
            Self::RisingHunter => "rising_hunter",
            Self::EliteHunter => "elite_hunter",
            Self::WeekStreak => "week_streak",
            Self::Scholar => "scholar",
            Self::ThousandXp => "thousand_xp",
            Self::MindExplorer => "mind_explorer",
            Self::SelfAware => "self_aware",
        }
    }

    /// Parse from database string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "first_quest" => Some(Self::FirstQuest),
            "quest_veteran" => Some(Self::QuestVeteran),
            "rising_hunter" => Some(Self::RisingHunter),
            "elite_hunter" => Some(Self::EliteHunter),
            "week_streak" => Some(Self::WeekStreak),
            "scholar" => Some(Self::Scholar),
            "thousand_xp" => Some(Self::ThousandXp),
            "mind_explorer" => Some(Self::MindExplorer),
            "self_aware" => Some(Self::SelfAware),
            _ => None,
        }
    }
}

/// Unlock condition of an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Level(u32),
    QuestsCompleted(u32),
    Streak(u32),
    StatThreshold { stat: StatKind, value: u32 },
    TotalXp(u64),
    /// Completed quests within one realm
    RealmQuests { realm: Realm, count: u32 },
    /// Reflections logged
    Reflections(u32),
}

impl Requirement {
    /// Kind name as used in achievement data
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Level(_) => "level",
            Self::QuestsCompleted(_) => "quests_completed",
            Self::Streak(_) => "streak",
            Self::StatThreshold { .. } => "stat_threshold",
            Self::TotalXp(_) => "total_xp",
            Self::RealmQuests { .. } => "realm_quests",
            Self::Reflections(_) => "reflections",
        }
    }

    /// Target value of the requirement
    pub fn target(&self) -> u64 {
        match self {
            Self::Level(v) | Self::QuestsCompleted(v) | Self::Streak(v) | Self::Reflections(v) => {
                u64::from(*v)
            }
            Self::StatThreshold { value, .. } => u64::from(*value),
            Self::TotalXp(v) => *v,
            Self::RealmQuests { count, .. } => u64::from(*count),
        }
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub requirement: Requirement,
}

/// All achievement definitions
pub static ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstQuest,
        name: "First Steps",
        description: "Complete your first quest",
        icon: "🎯",
        requirement: Requirement::QuestsCompleted(1),
    },
    Achievement {
        id: AchievementId::QuestVeteran,
        name: "Quest Veteran",
        description: "Complete 50 quests",
        icon: "🏅",
        requirement: Requirement::QuestsCompleted(50),
    },
    Achievement {
        id: AchievementId::RisingHunter,
        name: "Rising Hunter",
        description: "Reach level 5",
        icon: "📈",
        requirement: Requirement::Level(5),
    },
    Achievement {
        id: AchievementId::EliteHunter,
        name: "Elite Hunter",
        description: "Reach level 10 and unlock custom attributes",
        icon: "⚔️",
        requirement: Requirement::Level(10),
    },
    Achievement {
        id: AchievementId::WeekStreak,
        name: "Week Warrior",
        description: "Complete quests 7 days in a row",
        icon: "🔥",
        requirement: Requirement::Streak(7),
    },
    Achievement {
        id: AchievementId::Scholar,
        name: "Scholar",
        description: "Raise IQ to 50",
        icon: "🧠",
        requirement: Requirement::StatThreshold {
            stat: StatKind::Iq,
            value: 50,
        },
    },
    Achievement {
        id: AchievementId::ThousandXp,
        name: "Thousand Strong",
        description: "Earn 1000 total XP",
        icon: "💯",
        requirement: Requirement::TotalXp(1000),
    },
    Achievement {
        id: AchievementId::MindExplorer,
        name: "Mind Explorer",
        description: "Complete 10 Mind & Skill quests",
        icon: "📚",
        requirement: Requirement::RealmQuests {
            realm: Realm::MindSkill,
            count: 10,
        },
    },
    Achievement {
        id: AchievementId::SelfAware,
        name: "Self Aware",
        description: "Log 7 reflections",
        icon: "🪞",
        requirement: Requirement::Reflections(7),
    },
];

impl Achievement {
    /// Get achievement definition by ID
    pub fn get(id: AchievementId) -> Option<&'static Achievement> {
        ACHIEVEMENTS.iter().find(|a| a.id == id)
    }

    /// Get total number of achievements
    pub fn total_count() -> usize {
        ACHIEVEMENTS.len()
    }
}

/// Per-player unlock state of one achievement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementState {
    pub id: AchievementId,
    pub unlocked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
}

impl AchievementState {
    pub fn locked(id: AchievementId) -> Self {
        Self {
            id,
            unlocked: false,
            unlocked_at: None,
        }
    }

    /// One locked entry per catalog definition
    pub fn locked_catalog() -> Vec<Self> {
        ACHIEVEMENTS.iter().map(|a| Self::locked(a.id)).collect()
    }

    pub fn definition(&self) -> Option<&'static Achievement> {
        Achievement::get(self.id)
    }
}

/// Align stored states with the catalog: keep known entries, add missing ones locked
pub fn merge_with_catalog(states: Vec<AchievementState>) -> Vec<AchievementState> {
    ACHIEVEMENTS
        .iter()
        .map(|def| {
            states
                .iter()
                .find(|s| s.id == def.id)
                .cloned()
                .unwrap_or_else(|| AchievementState::locked(def.id))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_nine_unique_entries() {
        assert_eq!(Achievement::total_count(), 9);
        for (i, a) in ACHIEVEMENTS.iter().enumerate() {
            assert!(ACHIEVEMENTS[i + 1..].iter().all(|b| b.id != a.id));
        }
    }

    #[test]
    fn test_id_string_roundtrip() {
        for a in ACHIEVEMENTS {
            assert_eq!(AchievementId::from_str(a.id.as_str()), Some(a.id));
        }
        assert_eq!(AchievementId::from_str("nope"), None);
    }

    #[test]
    fn test_merge_keeps_unlocks_and_fills_gaps() {
        let now = Utc::now();
        let stored = vec![AchievementState {
            id: AchievementId::Scholar,
            unlocked: true,
            unlocked_at: Some(now),
        }];
        let merged = merge_with_catalog(stored);
        assert_eq!(merged.len(), ACHIEVEMENTS.len());
        let scholar = merged.iter().find(|s| s.id == AchievementId::Scholar).unwrap();
        assert!(scholar.unlocked);
        assert_eq!(merged.iter().filter(|s| s.unlocked).count(), 1);
    }
}
