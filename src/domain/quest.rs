//! Quest domain types

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::stats::StatKind;

/// Quest identifier (UUID v4 string)
pub type QuestId = String;

/// Cadence of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestType {
    Daily,
    Normal,
    Weekly,
    Main,
}

impl QuestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Normal => "Normal",
            Self::Weekly => "Weekly",
            Self::Main => "Main",
        }
    }
}

impl FromStr for QuestType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "normal" => Ok(Self::Normal),
            "weekly" => Ok(Self::Weekly),
            "main" => Ok(Self::Main),
            _ => Err(format!("unknown quest type: {}", s)),
        }
    }
}

impl fmt::Display for QuestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Difficulty fixes the XP reward of a quest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[serde(rename = "Life Achievement")]
    LifeAchievement,
}

impl Difficulty {
    pub fn xp(&self) -> u32 {
        match self {
            Self::Easy => 10,
            Self::Medium => 25,
            Self::Hard => 50,
            Self::LifeAchievement => 100,
        }
    }

    /// Hard and Life Achievement quests trigger secondary stat growth
    pub fn is_hard(&self) -> bool {
        matches!(self, Self::Hard | Self::LifeAchievement)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
            Self::LifeAchievement => "Life Achievement",
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            "lifeachievement" | "life" => Ok(Self::LifeAchievement),
            _ => Err(format!("unknown difficulty: {}", s)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thematic area of a quest, each tied to specific stat growth
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Realm {
    #[serde(rename = "Mind & Skill")]
    MindSkill,
    #[serde(rename = "Emotional & Spiritual")]
    EmotionalSpiritual,
    #[serde(rename = "Body & Discipline")]
    BodyDiscipline,
    #[serde(rename = "Creation & Mission")]
    CreationMission,
    #[serde(rename = "Heart & Loyalty")]
    HeartLoyalty,
}

impl Realm {
    pub const ALL: [Realm; 5] = [
        Self::MindSkill,
        Self::EmotionalSpiritual,
        Self::BodyDiscipline,
        Self::CreationMission,
        Self::HeartLoyalty,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MindSkill => "Mind & Skill",
            Self::EmotionalSpiritual => "Emotional & Spiritual",
            Self::BodyDiscipline => "Body & Discipline",
            Self::CreationMission => "Creation & Mission",
            Self::HeartLoyalty => "Heart & Loyalty",
        }
    }
}

impl FromStr for Realm {
    type Err = String;

    /// Accepts "Mind & Skill", "mind-skill", "mind" and similar spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "mindskill" | "mind" => Ok(Self::MindSkill),
            "emotionalspiritual" | "emotional" | "spirit" => Ok(Self::EmotionalSpiritual),
            "bodydiscipline" | "body" => Ok(Self::BodyDiscipline),
            "creationmission" | "creation" => Ok(Self::CreationMission),
            "heartloyalty" | "heart" => Ok(Self::HeartLoyalty),
            _ => Err(format!("unknown realm: {}", s)),
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repeat cadence for recurring quests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    Daily,
    Weekly,
}

impl Recurrence {
    pub fn period(&self) -> Duration {
        match self {
            Self::Daily => Duration::days(1),
            Self::Weekly => Duration::weeks(1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl FromStr for Recurrence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!("unknown recurrence: {}", s)),
        }
    }
}

/// A unit of user-declared or generated work
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: QuestId,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub difficulty: Difficulty,
    pub xp: u32,
    pub realm: Realm,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurring: Option<Recurrence>,
    /// Manual per-stat overrides added on top of the realm rule
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub stat_boosts: BTreeMap<StatKind, i32>,
    #[serde(default)]
    pub is_overdue: bool,
}

impl Quest {
    /// Build an active quest from a draft. XP always follows the difficulty.
    pub fn from_draft(draft: QuestDraft, id: QuestId, now: DateTime<Utc>) -> Self {
        let xp = draft.difficulty.xp();
        if let Some(requested) = draft.xp.filter(|requested| *requested != xp) {
            tracing::debug!(
                "Quest '{}' requested {} XP, using {} for {}",
                draft.title,
                requested,
                xp,
                draft.difficulty
            );
        }

        let mut quest = Self {
            id,
            title: draft.title,
            description: draft.description,
            quest_type: draft.quest_type,
            difficulty: draft.difficulty,
            xp,
            realm: draft.realm,
            completed: false,
            created_at: now,
            completed_at: None,
            due_date: draft.due_date,
            recurring: draft.recurring,
            stat_boosts: draft.stat_boosts,
            is_overdue: false,
        };
        quest.refresh_overdue(now);
        quest
    }

    pub fn refresh_overdue(&mut self, now: DateTime<Utc>) {
        self.is_overdue = !self.completed && self.due_date.is_some_and(|due| due < now);
    }

    /// Fresh active copy for the next period of a recurring quest
    pub fn next_occurrence(&self, id: QuestId, now: DateTime<Utc>) -> Option<Self> {
        let recurrence = self.recurring?;
        let base = self.due_date.unwrap_or(now).max(now);
        let mut next = Self {
            id,
            completed: false,
            created_at: now,
            completed_at: None,
            due_date: Some(base + recurrence.period()),
            is_overdue: false,
            ..self.clone()
        };
        next.refresh_overdue(now);
        Some(next)
    }
}

/// Quest as submitted by a user or returned by the quest oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub xp: Option<u32>,
    pub realm: Realm,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub recurring: Option<Recurrence>,
    #[serde(default)]
    pub stat_boosts: BTreeMap<StatKind, i32>,
}

impl QuestDraft {
    pub fn new(
        title: impl Into<String>,
        quest_type: QuestType,
        difficulty: Difficulty,
        realm: Realm,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            quest_type,
            difficulty,
            xp: None,
            realm,
            due_date: None,
            recurring: None,
            stat_boosts: BTreeMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_date(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurring = Some(recurrence);
        self
    }

    pub fn with_boost(mut self, stat: StatKind, amount: i32) -> Self {
        self.stat_boosts.insert(stat, amount);
        self
    }
}

/// Editable fields of an active quest
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

impl QuestPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.due_date.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_xp_follows_difficulty() {
        let mut draft = QuestDraft::new("Read", QuestType::Daily, Difficulty::Hard, Realm::MindSkill);
        draft.xp = Some(999);
        let quest = Quest::from_draft(draft, "q1".into(), at(1));
        assert_eq!(quest.xp, 50);
        assert!(!quest.completed);
    }

    #[test]
    fn test_overdue_on_creation() {
        let draft = QuestDraft::new("Run", QuestType::Normal, Difficulty::Easy, Realm::BodyDiscipline)
            .with_due_date(at(1));
        let quest = Quest::from_draft(draft, "q1".into(), at(2));
        assert!(quest.is_overdue);
    }

    #[test]
    fn test_next_occurrence_moves_due_date() {
        let draft = QuestDraft::new("Stretch", QuestType::Daily, Difficulty::Easy, Realm::BodyDiscipline)
            .with_recurrence(Recurrence::Daily)
            .with_due_date(at(5));
        let quest = Quest::from_draft(draft, "q1".into(), at(4));
        let next = quest.next_occurrence("q2".into(), at(4)).unwrap();
        assert_eq!(next.id, "q2");
        assert_eq!(next.due_date, Some(at(6)));
        assert!(!next.completed);
    }

    #[test]
    fn test_non_recurring_has_no_next_occurrence() {
        let draft = QuestDraft::new("Call mom", QuestType::Normal, Difficulty::Medium, Realm::HeartLoyalty);
        let quest = Quest::from_draft(draft, "q1".into(), at(1));
        assert!(quest.next_occurrence("q2".into(), at(1)).is_none());
    }

    #[test]
    fn test_draft_parses_oracle_json() {
        let json = r#"{
            "title": "Meditate",
            "description": "10 minutes of breathing",
            "type": "Daily",
            "difficulty": "Life Achievement",
            "xp": 100,
            "realm": "Emotional & Spiritual"
        }"#;
        let draft: QuestDraft = serde_json::from_str(json).unwrap();
        assert_eq!(draft.difficulty, Difficulty::LifeAchievement);
        assert_eq!(draft.realm, Realm::EmotionalSpiritual);
        assert_eq!(draft.xp, Some(100));
    }

    #[test]
    fn test_realm_parsing() {
        assert_eq!("Mind & Skill".parse::<Realm>().unwrap(), Realm::MindSkill);
        assert_eq!("heart-loyalty".parse::<Realm>().unwrap(), Realm::HeartLoyalty);
        assert!("sky".parse::<Realm>().is_err());
    }
}
