//! Player profile and rank

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stats::Stats;
use crate::progression::curve::{current_level_xp, rank_for_level, xp_threshold_for_level};

/// Coarse progression label derived from level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    E,
    D,
    C,
    B,
    A,
    S,
    #[serde(rename = "S+")]
    SPlus,
}

impl Rank {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::E => "E",
            Self::D => "D",
            Self::C => "C",
            Self::B => "B",
            Self::A => "A",
            Self::S => "S",
            Self::SPlus => "S+",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "E" => Some(Self::E),
            "D" => Some(Self::D),
            "C" => Some(Self::C),
            "B" => Some(Self::B),
            "A" => Some(Self::A),
            "S" => Some(Self::S),
            "S+" => Some(Self::SPlus),
            _ => None,
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's progression snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    pub level: u32,
    pub rank: Rank,
    /// XP earned inside the current level
    pub xp: u64,
    pub total_xp: u64,
    pub stats: Stats,
    #[serde(default)]
    pub custom_attributes: BTreeMap<String, u32>,
    /// Cumulative XP at which the next level is reached
    pub next_level_xp: u64,
    pub streak: u32,
    pub skill_points: u32,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerProfile {
    /// Level 1, no XP, every stat at its base value
    pub fn new() -> Self {
        Self {
            level: 1,
            rank: rank_for_level(1),
            xp: 0,
            total_xp: 0,
            stats: Stats::default(),
            custom_attributes: BTreeMap::new(),
            next_level_xp: xp_threshold_for_level(2),
            streak: 0,
            skill_points: 0,
        }
    }

    /// Re-derive rank, next threshold and in-level XP from level and total XP
    pub fn normalize(&mut self) {
        self.level = self.level.max(1);
        self.rank = rank_for_level(self.level);
        self.next_level_xp = xp_threshold_for_level(self.level + 1);
        self.xp = current_level_xp(self.total_xp, self.level);
    }

    /// XP still missing before the next level
    pub fn xp_to_next_level(&self) -> u64 {
        self.next_level_xp.saturating_sub(self.total_xp)
    }
}
