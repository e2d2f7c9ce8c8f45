//! Quest commands: add, list, complete, delete, edit

use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::Subcommand;

use questline::domain::{
    Difficulty, Quest, QuestDraft, QuestPatch, QuestType, Realm, Recurrence, StatKind,
};

use super::{resolve_quest_id, short_id, AppContext};

#[derive(Subcommand)]
pub enum QuestAction {
    /// Add a quest
    Add {
        /// Quest title
        title: String,

        /// Realm: mind, emotional, body, creation or heart
        #[arg(short, long)]
        realm: Realm,

        /// Easy, Medium, Hard or "Life Achievement"
        #[arg(short, long, default_value = "easy")]
        difficulty: Difficulty,

        /// Daily, Normal, Weekly or Main
        #[arg(short = 't', long = "type", default_value = "normal")]
        quest_type: QuestType,

        #[arg(long)]
        description: Option<String>,

        /// Due date (YYYY-MM-DD or RFC 3339)
        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,

        /// Respawn after completion: daily or weekly
        #[arg(long)]
        recurring: Option<Recurrence>,

        /// Extra stat growth, e.g. --boost iq=2 (repeatable)
        #[arg(long = "boost", value_parser = parse_boost)]
        boosts: Vec<(StatKind, i32)>,
    },

    /// List quests
    List {
        /// Show completed quests instead of active ones
        #[arg(long)]
        completed: bool,
    },

    /// Complete a quest by ID or unique ID prefix
    Complete { id: String },

    /// Delete an active quest
    Delete { id: String },

    /// Edit an active quest
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_parser = parse_due)]
        due: Option<DateTime<Utc>>,
    },
}

pub fn quest_command(ctx: &AppContext, action: QuestAction) -> Result<()> {
    let mut session = ctx.open_session()?;
    let now = Utc::now();

    match action {
        QuestAction::Add {
            title,
            realm,
            difficulty,
            quest_type,
            description,
            due,
            recurring,
            boosts,
        } => {
            if title.trim().is_empty() {
                bail!("Quest title cannot be empty");
            }
            let mut draft = QuestDraft::new(title.trim(), quest_type, difficulty, realm);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(due) = due {
                draft = draft.with_due_date(due);
            }
            if let Some(recurrence) = recurring {
                draft = draft.with_recurrence(recurrence);
            }
            for (stat, amount) in boosts {
                draft = draft.with_boost(stat, amount);
            }

            let ids = session.add_quests(vec![draft], now)?;
            for id in ids {
                println!("Added quest {} ({} XP)", short_id(&id), difficulty.xp());
            }
        }

        QuestAction::List { completed } => {
            session.refresh_overdue(now);
            let state = session.state();
            let quests = if completed {
                &state.completed_quests
            } else {
                &state.quests
            };
            if quests.is_empty() {
                println!("No {} quests.", if completed { "completed" } else { "active" });
                return Ok(());
            }
            println!(
                "{} quests ({}):\n",
                if completed { "Completed" } else { "Active" },
                quests.len()
            );
            for quest in quests {
                print_quest(quest);
            }
        }

        QuestAction::Complete { id } => {
            let id = resolve_quest_id(session.state(), &id)?;
            let mut rng = rand::thread_rng();
            let Some(outcome) = session.complete_quest(&id, now, &mut rng)? else {
                println!("Quest {} is already completed.", short_id(&id));
                return Ok(());
            };

            println!("Quest complete: {}", outcome.quest.title);
            println!("  +{} XP", outcome.xp_gained);
            if !outcome.deltas.is_empty() {
                println!("  {}", outcome.deltas);
            }
            if let Some(level_up) = &outcome.level_up {
                println!(
                    "  LEVEL UP! {} -> {} (rank {}), +1 skill point",
                    level_up.old_level, level_up.new_level, level_up.new_rank
                );
            }
            for achievement in &outcome.unlocked {
                if let Some(def) = questline::progression::Achievement::get(*achievement) {
                    println!("  Achievement unlocked: {} {}", def.icon, def.name);
                }
            }
            if let Some(next) = &outcome.respawned {
                println!("  Next occurrence: {}", short_id(&next.id));
            }
        }

        QuestAction::Delete { id } => {
            let id = resolve_quest_id(session.state(), &id)?;
            match session.delete_quest(&id)? {
                Some(quest) => println!("Deleted quest: {}", quest.title),
                None => bail!("Completed quests cannot be deleted"),
            }
        }

        QuestAction::Edit {
            id,
            title,
            description,
            due,
        } => {
            let patch = QuestPatch {
                title,
                description,
                due_date: due,
            };
            if patch.is_empty() {
                bail!("Nothing to change: pass --title, --description or --due");
            }
            let id = resolve_quest_id(session.state(), &id)?;
            match session.edit_quest(&id, patch, now)? {
                Some(quest) => println!("Updated quest: {}", quest.title),
                None => bail!("Completed quests cannot be edited"),
            }
        }
    }

    Ok(())
}

fn print_quest(quest: &Quest) {
    let marker = if quest.completed {
        "x"
    } else if quest.is_overdue {
        "!"
    } else {
        " "
    };
    println!(
        "  [{}] {} {} ({}, {}, {} XP) - {}",
        marker,
        short_id(&quest.id),
        quest.title,
        quest.quest_type,
        quest.difficulty,
        quest.xp,
        quest.realm
    );
    if !quest.description.is_empty() {
        println!("      {}", quest.description);
    }
    if let Some(due) = quest.due_date {
        let note = if quest.is_overdue { " (overdue)" } else { "" };
        println!("      Due: {}{}", due.format("%Y-%m-%d %H:%M"), note);
    }
    if let Some(recurrence) = quest.recurring {
        println!("      Repeats {}", recurrence.as_str());
    }
}

/// `YYYY-MM-DD` (end of that day, UTC) or a full RFC 3339 timestamp
pub fn parse_due(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(23, 59, 59))
        .map(|at| at.and_utc())
        .ok_or_else(|| format!("invalid date '{}': use YYYY-MM-DD or RFC 3339", raw))
}

/// `stat=amount`, e.g. `iq=2`
pub fn parse_boost(raw: &str) -> Result<(StatKind, i32), String> {
    let (stat, amount) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid boost '{}': expected stat=amount", raw))?;
    let stat: StatKind = stat.parse()?;
    let amount: i32 = amount
        .trim()
        .parse()
        .map_err(|_| format!("invalid boost amount '{}'", amount))?;
    Ok((stat, amount))
}
