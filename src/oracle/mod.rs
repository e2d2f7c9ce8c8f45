//! Quest oracle: the LLM collaborator
//!
//! Generates quests from a player snapshot and reads the emotional tone of
//! free text. Implementations never fail: when the model is unreachable or
//! answers nonsense they return canned answers from [`fallback`].

pub mod fallback;
mod gemini;
mod prompts;
mod types;

pub use gemini::GeminiOracle;
pub use prompts::{emotion_prompt, quest_prompt};
pub use types::{QuestPlan, QuestRequest, Suggestions, MAX_DIARY_CONTEXT};

use crate::config::OracleSettings;
use crate::domain::EmotionalAnalysis;

pub trait QuestOracle {
    fn generate_quests(&self, request: &QuestRequest) -> QuestPlan;

    fn analyze_emotion(&self, text: &str) -> EmotionalAnalysis;
}

/// Oracle used when no API key is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineOracle;

impl QuestOracle for OfflineOracle {
    fn generate_quests(&self, request: &QuestRequest) -> QuestPlan {
        fallback::default_plan(request)
    }

    fn analyze_emotion(&self, text: &str) -> EmotionalAnalysis {
        fallback::neutral_analysis(text)
    }
}

/// Gemini when an API key is available, otherwise offline defaults
pub fn from_settings(settings: &OracleSettings) -> Box<dyn QuestOracle> {
    match settings.api_key() {
        Some(key) => Box::new(GeminiOracle::new(settings, key)),
        None => {
            tracing::info!("No Gemini API key configured, using offline quest suggestions");
            Box::new(OfflineOracle)
        }
    }
}
