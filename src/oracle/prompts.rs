//! Prompt templates for the quest oracle

use std::fmt::Write;

use super::types::QuestRequest;
use crate::domain::{Difficulty, Realm};

const QUEST_SCHEMA: &str = r#"{
  "quests": [
    {
      "title": "string",
      "description": "string",
      "type": "Daily | Normal | Weekly | Main",
      "difficulty": "Easy | Medium | Hard | Life Achievement",
      "xp": number,
      "realm": "Mind & Skill | Emotional & Spiritual | Body & Discipline | Creation & Mission | Heart & Loyalty"
    }
  ],
  "suggestions": {
    "focusArea": "string",
    "motivation": "string",
    "emotionalGuidance": "string"
  }
}"#;

const EMOTION_SCHEMA: &str = r#"{
  "mood": "string",
  "emotionalState": "string",
  "currentChallenges": "string",
  "motivationLevel": number (1-10)
}"#;

/// Prompt asking for 3-5 personalised quests
pub fn quest_prompt(request: &QuestRequest) -> String {
    let player = &request.player;
    let mut prompt = String::new();

    let _ = writeln!(
        prompt,
        "You are the quest master of a personal growth RPG. Create 3 to 5 quests for this player."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(
        prompt,
        "Player: level {}, rank {}, {} total XP, {} day streak.",
        player.level, player.rank, player.total_xp, player.streak
    );
    let stats: Vec<String> = player
        .stats
        .iter()
        .map(|(kind, value)| format!("{} {}", kind, value))
        .collect();
    let _ = writeln!(prompt, "Stats: {}.", stats.join(", "));
    if !player.custom_attributes.is_empty() {
        let custom: Vec<String> = player
            .custom_attributes
            .iter()
            .map(|(name, value)| format!("{} {}", name, value))
            .collect();
        let _ = writeln!(prompt, "Custom attributes: {}.", custom.join(", "));
    }

    if let Some(reflection) = &request.reflection {
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Latest reflection:");
        let _ = writeln!(prompt, "- Mood: {}", reflection.mood);
        let _ = writeln!(prompt, "- Emotional state: {}", reflection.emotional_state);
        let _ = writeln!(prompt, "- Current challenges: {}", reflection.current_challenges);
        let _ = writeln!(prompt, "- Motivation: {}/10", reflection.motivation_level);
    }

    if !request.recent_diary.is_empty() {
        let _ = writeln!(prompt);
        let _ = writeln!(prompt, "Recent diary entries (newest first):");
        for entry in &request.recent_diary {
            let _ = writeln!(prompt, "- {}", entry.trim());
        }
    }

    let _ = writeln!(prompt);
    let realms: Vec<&str> = Realm::ALL.iter().map(|r| r.as_str()).collect();
    let _ = writeln!(prompt, "Realms: {}.", realms.join(", "));
    let rewards: Vec<String> = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::LifeAchievement,
    ]
    .iter()
    .map(|d| format!("{} = {} XP", d, d.xp()))
    .collect();
    let _ = writeln!(prompt, "XP by difficulty: {}.", rewards.join(", "));
    let _ = writeln!(
        prompt,
        "Balance the realms, favour the player's weaker stats and keep quests concrete."
    );
    let _ = writeln!(prompt);
    let _ = writeln!(prompt, "Respond with JSON only, in exactly this shape:");
    prompt.push_str(QUEST_SCHEMA);
    prompt
}

/// Prompt asking for an emotional reading of free text
pub fn emotion_prompt(text: &str) -> String {
    format!(
        "Analyze the emotional tone of this personal journal text.\n\n\
         Text:\n\"\"\"\n{}\n\"\"\"\n\n\
         Respond with JSON only, in exactly this shape:\n{}",
        text.trim(),
        EMOTION_SCHEMA
    )
}
