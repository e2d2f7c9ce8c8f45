//! Export, import, reset and custom attribute commands

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Utc;

use questline::config::write_atomic;
use questline::progression::Progression;

use super::AppContext;

/// Write the player's full progression as pretty JSON
pub fn export_command(ctx: &AppContext, output: &Path) -> Result<()> {
    let session = ctx.open_session()?;
    let json = serde_json::to_string_pretty(session.state())?;
    write_atomic(output, json.as_bytes())?;
    println!(
        "Exported {} active and {} completed quest(s) to {}",
        session.state().quests.len(),
        session.state().completed_quests.len(),
        output.display()
    );
    Ok(())
}

/// Replace the player's progression with a previously exported file
pub fn import_command(ctx: &AppContext, input: &Path, yes: bool) -> Result<()> {
    if !yes {
        bail!("Import replaces all progress for this player. Re-run with --yes to confirm.");
    }
    let content = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let snapshot: Progression = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a questline export", input.display()))?;

    let mut session = ctx.open_session()?;
    session.import(snapshot, Utc::now())?;
    let player = &session.state().player;
    println!(
        "Imported: level {} ({} XP), {} active quest(s)",
        player.level,
        player.total_xp,
        session.state().quests.len()
    );
    Ok(())
}

pub fn reset_command(ctx: &AppContext, yes: bool) -> Result<()> {
    if !yes {
        bail!("Reset deletes all progress for this player. Re-run with --yes to confirm.");
    }
    let mut session = ctx.open_session()?;
    session.reset(Utc::now())?;
    println!("Progress reset for {}", session.user_id());
    Ok(())
}

/// Spend a skill point on a new custom attribute
pub fn attribute_create_command(ctx: &AppContext, name: &str) -> Result<()> {
    let mut session = ctx.open_session()?;
    session.create_custom_attribute(name)?;
    println!(
        "Created attribute '{}' ({} skill point(s) left)",
        name.trim(),
        session.state().player.skill_points
    );
    Ok(())
}
