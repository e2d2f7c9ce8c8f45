//! Achievement and analytics views

use anyhow::Result;

use questline::progression::achievements::{progress, EvaluationInput};
use questline::progression::Achievement;

use super::{progress_bar, AppContext};

/// List the catalog with unlock state and progress
pub fn achievements_command(ctx: &AppContext) -> Result<()> {
    let session = ctx.open_session()?;
    let state = session.state();
    let input = EvaluationInput {
        player: &state.player,
        completed: &state.completed_quests,
        reflections: state.reflections.len(),
    };

    println!(
        "Achievements ({}/{} unlocked):\n",
        state.unlocked_count(),
        state.achievements.len()
    );
    for achievement in &state.achievements {
        let Some(def) = Achievement::get(achievement.id) else {
            continue;
        };
        if achievement.unlocked {
            let when = achievement
                .unlocked_at
                .map(|at| at.format(" (%Y-%m-%d)").to_string())
                .unwrap_or_default();
            println!("  {} {}{}", def.icon, def.name, when);
        } else {
            let target = def.requirement.target();
            let current = progress(&def.requirement, &input).min(target);
            let fraction = if target == 0 { 1.0 } else { current as f32 / target as f32 };
            println!(
                "  {} {} {} {}/{}",
                def.icon,
                def.name,
                progress_bar(fraction, 10),
                current,
                target
            );
        }
        println!("      {}", def.description);
    }

    Ok(())
}

/// Print derived analytics, as text or JSON
pub fn analytics_command(ctx: &AppContext, json: bool) -> Result<()> {
    let session = ctx.open_session()?;
    let analytics = &session.state().analytics;

    if json {
        println!("{}", serde_json::to_string_pretty(analytics)?);
        return Ok(());
    }

    println!("Streak: {} day(s), longest {}", analytics.current_streak, analytics.longest_streak);
    for (label, period) in [("7 days", &analytics.last_7_days), ("30 days", &analytics.last_30_days)] {
        println!(
            "Last {}: {} quest(s), {} XP, {} active day(s)",
            label, period.quests_completed, period.xp_earned, period.active_days
        );
    }

    if !analytics.realms.is_empty() {
        println!("\nRealms:");
        for (realm, perf) in &analytics.realms {
            println!(
                "  {:<22} {:>4} quest(s) {:>6} XP  {:>5.1}%",
                realm.as_str(),
                perf.quests_completed,
                perf.xp_earned,
                perf.share * 100.0
            );
        }
    }
    if let Some(realm) = analytics.strongest_realm() {
        println!("Strongest realm: {}", realm);
    }
    if let Some(realm) = analytics.weakest_realm() {
        println!("Needs attention: {}", realm);
    }

    println!("\nReflections logged: {}", analytics.reflections_logged);
    if let Some(average) = analytics.average_motivation {
        println!("Average motivation: {:.1}", average);
    }
    if let Some(mood) = &analytics.dominant_mood {
        println!("Dominant mood: {}", mood);
    }

    Ok(())
}
