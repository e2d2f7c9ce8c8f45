//! Generate command: ask the oracle for new quests

use anyhow::Result;
use chrono::Utc;

use questline::oracle::{self, QuestRequest};

use super::AppContext;

pub fn generate_command(ctx: &AppContext, accept: bool) -> Result<()> {
    let mut session = ctx.open_session()?;
    let request = QuestRequest::from_state(session.state());
    let plan = oracle::from_settings(&ctx.config.oracle).generate_quests(&request);

    println!("Suggested quests:\n");
    for (index, draft) in plan.quests.iter().enumerate() {
        println!(
            "  {}. {} ({}, {}, {} XP) - {}",
            index + 1,
            draft.title,
            draft.quest_type,
            draft.difficulty,
            draft.difficulty.xp(),
            draft.realm
        );
        if !draft.description.is_empty() {
            println!("     {}", draft.description);
        }
    }

    let suggestions = &plan.suggestions;
    if !suggestions.focus_area.is_empty() {
        println!("\nFocus: {}", suggestions.focus_area);
    }
    if !suggestions.motivation.is_empty() {
        println!("{}", suggestions.motivation);
    }
    if !suggestions.emotional_guidance.is_empty() {
        println!("{}", suggestions.emotional_guidance);
    }

    if accept {
        let ids = session.add_quests(plan.quests, Utc::now())?;
        println!("\nAdded {} quest(s).", ids.len());
    } else {
        println!("\nRun with --accept to add them.");
    }

    Ok(())
}
