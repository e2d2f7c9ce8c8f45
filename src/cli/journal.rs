//! Reflection and diary commands

use anyhow::{bail, Result};
use chrono::Utc;
use clap::Subcommand;

use questline::domain::{EmotionalAnalysis, PersonalReflection, MOTIVATION_RANGE};
use questline::oracle;
use questline::progression::Achievement;

use super::{short_id, AppContext};

#[derive(Subcommand)]
pub enum DiaryAction {
    /// Write a diary entry
    Add {
        content: String,

        #[arg(long)]
        mood: Option<String>,
    },

    /// Show recent diary entries
    List {
        #[arg(short = 'n', long, default_value = "10")]
        limit: usize,
    },
}

/// Arguments of `questline reflect`
pub struct ReflectArgs {
    pub text: String,
    pub mood: Option<String>,
    pub motivation: Option<u8>,
    pub notes: Option<String>,
}

/// Record a reflection. With `--mood` and `--motivation` the text is stored as
/// given; otherwise the oracle reads its tone first.
pub fn reflect_command(ctx: &AppContext, args: ReflectArgs) -> Result<()> {
    if args.text.trim().is_empty() {
        bail!("Reflection text cannot be empty");
    }
    if let Some(level) = args.motivation {
        if !MOTIVATION_RANGE.contains(&level) {
            bail!(
                "Motivation must be between {} and {}",
                MOTIVATION_RANGE.start(),
                MOTIVATION_RANGE.end()
            );
        }
    }

    let mut session = ctx.open_session()?;
    let now = Utc::now();

    let analysis = match (args.mood, args.motivation) {
        (Some(mood), Some(motivation_level)) => EmotionalAnalysis {
            mood,
            emotional_state: "self-reported".to_string(),
            current_challenges: String::new(),
            motivation_level,
        },
        (mood, motivation) => {
            let mut analysis = oracle::from_settings(&ctx.config.oracle).analyze_emotion(&args.text);
            if let Some(mood) = mood {
                analysis.mood = mood;
            }
            if let Some(level) = motivation {
                analysis.motivation_level = level;
            }
            analysis
        }
    };

    let notes = args.notes.or(Some(args.text));
    let reflection = PersonalReflection::from_analysis(analysis, notes, now);
    let unlocked = session.set_reflection(reflection, now)?;

    if let Some(saved) = session.state().reflections.first() {
        println!("Reflection recorded");
        println!("  Mood:       {}", saved.mood);
        println!("  State:      {}", saved.emotional_state);
        if !saved.current_challenges.is_empty() {
            println!("  Challenges: {}", saved.current_challenges);
        }
        println!("  Motivation: {}/{}", saved.motivation_level, MOTIVATION_RANGE.end());
    }
    for id in unlocked {
        if let Some(def) = Achievement::get(id) {
            println!("  Achievement unlocked: {} {}", def.icon, def.name);
        }
    }

    Ok(())
}

pub fn diary_command(ctx: &AppContext, action: DiaryAction) -> Result<()> {
    let mut session = ctx.open_session()?;

    match action {
        DiaryAction::Add { content, mood } => {
            if content.trim().is_empty() {
                bail!("Diary entry cannot be empty");
            }
            let entry = session.add_diary_entry(content.trim(), mood, Utc::now())?;
            println!("Saved diary entry {}", short_id(&entry.id));
        }

        DiaryAction::List { limit } => {
            let diary = &session.state().diary;
            if diary.is_empty() {
                println!("Diary is empty.");
                return Ok(());
            }
            for entry in diary.iter().take(limit) {
                let mood = entry
                    .mood
                    .as_deref()
                    .map(|m| format!(" [{}]", m))
                    .unwrap_or_default();
                println!("{}{}", entry.created_at.format("%Y-%m-%d %H:%M"), mood);
                println!("  {}\n", entry.content);
            }
        }
    }

    Ok(())
}
