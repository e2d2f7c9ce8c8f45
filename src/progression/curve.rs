//! XP and level curve
//!
//! Thresholds are totals, not per-level costs: level 1 starts at 0 and
//! level `L + 1` is reached at `floor(100 * 1.5^(L-1))` total XP, so
//! level 2 at 100, level 3 at 150, level 4 at 225, and so on.

use crate::domain::Rank;

/// XP needed to leave level 1
pub const BASE_LEVEL_XP: f64 = 100.0;

/// Growth factor of the per-level cost
pub const LEVEL_GROWTH: f64 = 1.5;

/// Highest reachable level. Thresholds up to `MAX_LEVEL + 1` fit in `u64`.
pub const MAX_LEVEL: u32 = 90;

/// Rank table (minimum level, rank), highest first
pub static RANKS: &[(u32, Rank)] = &[
    (50, Rank::SPlus),
    (40, Rank::S),
    (30, Rank::A),
    (20, Rank::B),
    (10, Rank::C),
    (5, Rank::D),
    (1, Rank::E),
];

/// Outcome of checking a new XP total against the curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpResolution {
    pub leveled_up: bool,
    pub new_level: u32,
    pub new_rank: Rank,
}

/// Total XP at which `level` is left for `level + 1`
pub fn required_xp_for_level(level: u32) -> u64 {
    let exponent = level.saturating_sub(1).min(i32::MAX as u32) as i32;
    // float-to-int `as` saturates
    (BASE_LEVEL_XP * LEVEL_GROWTH.powi(exponent)).floor() as u64
}

/// Total XP required to have reached `level`
pub fn xp_threshold_for_level(level: u32) -> u64 {
    if level <= 1 {
        0
    } else {
        required_xp_for_level(level - 1)
    }
}

/// XP earned inside `level`; falls back to `total_xp` if the pair is inconsistent
pub fn current_level_xp(total_xp: u64, level: u32) -> u64 {
    total_xp
        .checked_sub(xp_threshold_for_level(level))
        .unwrap_or(total_xp)
}

/// Advance from `current_level` as far as `total_xp` allows (multi-level jumps included)
pub fn resolve_level_up(total_xp: u64, current_level: u32) -> LevelUpResolution {
    let start = current_level.clamp(1, MAX_LEVEL);
    let mut level = start;
    while level < MAX_LEVEL && total_xp >= xp_threshold_for_level(level + 1) {
        level += 1;
    }

    LevelUpResolution {
        leveled_up: level > current_level,
        new_level: level,
        new_rank: rank_for_level(level),
    }
}

/// Level a fresh profile would reach with `total_xp`
pub fn level_for_total_xp(total_xp: u64) -> u32 {
    resolve_level_up(total_xp, 1).new_level
}

pub fn rank_for_level(level: u32) -> Rank {
    RANKS
        .iter()
        .find(|(min_level, _)| level >= *min_level)
        .map(|(_, rank)| *rank)
        .unwrap_or(Rank::E)
}

/// Progress towards the next level (0.0 - 1.0)
pub fn progress_to_next(total_xp: u64, level: u32) -> f32 {
    if level >= MAX_LEVEL {
        return 1.0;
    }
    let span = xp_threshold_for_level(level + 1).saturating_sub(xp_threshold_for_level(level));
    if span == 0 {
        1.0
    } else {
        (current_level_xp(total_xp, level) as f32 / span as f32).min(1.0)
    }
}
