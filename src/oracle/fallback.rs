//! Canned oracle answers used when the LLM is unavailable

use super::types::{QuestPlan, QuestRequest, Suggestions};
use crate::domain::{Difficulty, EmotionalAnalysis, QuestDraft, QuestType, Realm, StatKind};

/// Realm whose base growth feeds `stat`
fn realm_for(stat: StatKind) -> Realm {
    match stat {
        StatKind::Iq | StatKind::Technical => Realm::MindSkill,
        StatKind::Eq => Realm::EmotionalSpiritual,
        StatKind::Strength | StatKind::ProblemSolving => Realm::BodyDiscipline,
        StatKind::Aptitude => Realm::CreationMission,
    }
}

/// Three starter quests, aimed at the player's weakest stat
pub fn default_plan(request: &QuestRequest) -> QuestPlan {
    let weakest = request
        .player
        .stats
        .iter()
        .min_by_key(|(_, value)| *value)
        .map(|(kind, _)| kind)
        .unwrap_or(StatKind::Strength);
    let focus = realm_for(weakest);

    let mut quests = vec![
        QuestDraft::new(
            "Read for 20 minutes",
            QuestType::Daily,
            Difficulty::Easy,
            Realm::MindSkill,
        )
        .with_description("Pick a book or article that teaches you something new."),
        QuestDraft::new(
            "Take a 30 minute walk",
            QuestType::Daily,
            Difficulty::Easy,
            Realm::BodyDiscipline,
        )
        .with_description("No phone. Notice your breathing and surroundings."),
        QuestDraft::new(
            "Write down three things you are grateful for",
            QuestType::Daily,
            Difficulty::Easy,
            Realm::EmotionalSpiritual,
        )
        .with_description("Be specific about why each one matters."),
    ];

    if !quests.iter().any(|q| q.realm == focus) {
        quests.push(
            QuestDraft::new(
                "Make progress on a personal project",
                QuestType::Normal,
                Difficulty::Medium,
                focus,
            )
            .with_description("Spend one focused hour building something of your own."),
        );
    }

    QuestPlan {
        quests,
        suggestions: Suggestions {
            focus_area: format!("{} ({})", focus, weakest),
            motivation: "Small quests done daily beat big plans done never.".to_string(),
            emotional_guidance: "Progress is not linear. Rest counts as part of the journey."
                .to_string(),
        },
    }
}

/// Neutral reading returned when emotional analysis fails
pub fn neutral_analysis(_text: &str) -> EmotionalAnalysis {
    EmotionalAnalysis {
        mood: "neutral".to_string(),
        emotional_state: "balanced".to_string(),
        current_challenges: "none identified".to_string(),
        motivation_level: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlayerProfile;

    fn request_with(player: PlayerProfile) -> QuestRequest {
        QuestRequest {
            player,
            reflection: None,
            recent_diary: Vec::new(),
        }
    }

    #[test]
    fn test_plan_is_never_empty() {
        let plan = default_plan(&request_with(PlayerProfile::new()));
        assert!(plan.quests.len() >= 3);
        assert!(!plan.suggestions.focus_area.is_empty());
    }

    #[test]
    fn test_plan_targets_weakest_stat() {
        let mut player = PlayerProfile::new();
        for kind in StatKind::ALL {
            player.stats.set(kind, 40);
        }
        player.stats.set(StatKind::Aptitude, 12);

        let plan = default_plan(&request_with(player));

        assert!(plan.quests.iter().any(|q| q.realm == Realm::CreationMission));
        assert!(plan.suggestions.focus_area.contains("Creation & Mission"));
    }

    #[test]
    fn test_neutral_analysis_is_mid_scale() {
        let analysis = neutral_analysis("anything");
        assert_eq!(analysis.motivation_level, 5);
        assert_eq!(analysis.mood, "neutral");
    }
}
