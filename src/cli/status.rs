//! Status command implementation

use anyhow::Result;
use chrono::Utc;

use questline::domain::Stats;
use questline::progression::curve::{progress_to_next, MAX_LEVEL};

use super::{progress_bar, AppContext};

/// Show level, XP, stats and streak for the configured player
pub fn status_command(ctx: &AppContext) -> Result<()> {
    let mut session = ctx.open_session()?;
    session.refresh_overdue(Utc::now());
    let state = session.state();
    let player = &state.player;

    println!("Player: {}", session.user_id());
    println!("  Level {} (rank {})", player.level, player.rank);
    if player.level >= MAX_LEVEL {
        println!("  XP    {} total (max level)", player.total_xp);
    } else {
        println!(
            "  XP    {} {} / {} ({} to next level)",
            progress_bar(progress_to_next(player.total_xp, player.level), 20),
            player.total_xp,
            player.next_level_xp,
            player.xp_to_next_level()
        );
    }
    println!("  Streak: {} day(s)", player.streak);
    println!("  Skill points: {}", player.skill_points);

    println!("\nStats:");
    for (kind, value) in player.stats.iter() {
        let tier = Stats::tier(value);
        if tier > 0 {
            println!("  {:<20} {:>5}  (tier {})", kind.label(), value, tier);
        } else {
            println!("  {:<20} {:>5}", kind.label(), value);
        }
    }

    if !player.custom_attributes.is_empty() {
        println!("\nCustom attributes:");
        for (name, value) in &player.custom_attributes {
            println!("  {:<20} {:>5}", name, value);
        }
    }

    let overdue = state.quests.iter().filter(|q| q.is_overdue).count();
    println!(
        "\nQuests: {} active ({} overdue), {} completed",
        state.quests.len(),
        overdue,
        state.completed_quests.len()
    );
    println!(
        "Achievements: {}/{}",
        state.unlocked_count(),
        state.achievements.len()
    );

    Ok(())
}
