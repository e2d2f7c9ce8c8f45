//! Player attributes
//!
//! Six fixed attributes grow as quests are completed. Custom attributes live
//! on the profile itself and are not part of [`Stats`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Starting value of every fixed attribute
pub const BASE_STAT_VALUE: u32 = 10;

/// Width of a display tier ("breakthrough") band
pub const TIER_WIDTH: u32 = 100;

/// One of the six fixed attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "IQ")]
    Iq,
    #[serde(rename = "EQ")]
    Eq,
    #[serde(rename = "Strength")]
    Strength,
    #[serde(rename = "Technical Attribute")]
    Technical,
    #[serde(rename = "Aptitude")]
    Aptitude,
    #[serde(rename = "Problem Solving")]
    ProblemSolving,
}

impl StatKind {
    pub const ALL: [StatKind; 6] = [
        Self::Iq,
        Self::Eq,
        Self::Strength,
        Self::Technical,
        Self::Aptitude,
        Self::ProblemSolving,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Iq => "IQ",
            Self::Eq => "EQ",
            Self::Strength => "Strength",
            Self::Technical => "Technical Attribute",
            Self::Aptitude => "Aptitude",
            Self::ProblemSolving => "Problem Solving",
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for StatKind {
    type Err = String;

    /// Accepts the display label or a short alias, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "iq" => Ok(Self::Iq),
            "eq" => Ok(Self::Eq),
            "strength" | "str" => Ok(Self::Strength),
            "technicalattribute" | "technical" | "tech" => Ok(Self::Technical),
            "aptitude" | "apt" => Ok(Self::Aptitude),
            "problemsolving" | "ps" => Ok(Self::ProblemSolving),
            _ => Err(format!("unknown stat: {}", s)),
        }
    }
}

/// Values of the six fixed attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    #[serde(rename = "IQ")]
    pub iq: u32,
    #[serde(rename = "EQ")]
    pub eq: u32,
    #[serde(rename = "Strength")]
    pub strength: u32,
    #[serde(rename = "Technical Attribute")]
    pub technical: u32,
    #[serde(rename = "Aptitude")]
    pub aptitude: u32,
    #[serde(rename = "Problem Solving")]
    pub problem_solving: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self::uniform(BASE_STAT_VALUE)
    }
}

impl Stats {
    pub fn uniform(value: u32) -> Self {
        Self {
            iq: value,
            eq: value,
            strength: value,
            technical: value,
            aptitude: value,
            problem_solving: value,
        }
    }

    pub fn get(&self, kind: StatKind) -> u32 {
        match kind {
            StatKind::Iq => self.iq,
            StatKind::Eq => self.eq,
            StatKind::Strength => self.strength,
            StatKind::Technical => self.technical,
            StatKind::Aptitude => self.aptitude,
            StatKind::ProblemSolving => self.problem_solving,
        }
    }

    fn slot(&mut self, kind: StatKind) -> &mut u32 {
        match kind {
            StatKind::Iq => &mut self.iq,
            StatKind::Eq => &mut self.eq,
            StatKind::Strength => &mut self.strength,
            StatKind::Technical => &mut self.technical,
            StatKind::Aptitude => &mut self.aptitude,
            StatKind::ProblemSolving => &mut self.problem_solving,
        }
    }

    /// Increase a stat, saturating at `u32::MAX`
    pub fn add(&mut self, kind: StatKind, amount: u32) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(amount);
    }

    pub fn set(&mut self, kind: StatKind, value: u32) {
        *self.slot(kind) = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, u32)> + '_ {
        StatKind::ALL.iter().map(move |kind| (*kind, self.get(*kind)))
    }

    /// Display tier of a raw value (0 for 0..=99, 1 for 100..=199, ...)
    pub fn tier(value: u32) -> u32 {
        value / TIER_WIDTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stats_are_base_value() {
        let stats = Stats::default();
        assert!(stats.iter().all(|(_, v)| v == BASE_STAT_VALUE));
    }

    #[test]
    fn test_parse_stat_aliases() {
        assert_eq!("IQ".parse::<StatKind>().unwrap(), StatKind::Iq);
        assert_eq!("problem solving".parse::<StatKind>().unwrap(), StatKind::ProblemSolving);
        assert_eq!("Technical Attribute".parse::<StatKind>().unwrap(), StatKind::Technical);
        assert_eq!("str".parse::<StatKind>().unwrap(), StatKind::Strength);
        assert!("charisma".parse::<StatKind>().is_err());
    }

    #[test]
    fn test_add_saturates() {
        let mut stats = Stats::uniform(u32::MAX - 1);
        stats.add(StatKind::Eq, 5);
        assert_eq!(stats.eq, u32::MAX);
    }

    #[test]
    fn test_tier_bands() {
        assert_eq!(Stats::tier(0), 0);
        assert_eq!(Stats::tier(99), 0);
        assert_eq!(Stats::tier(100), 1);
        assert_eq!(Stats::tier(250), 2);
    }

    #[test]
    fn test_serialized_keys_use_labels() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert_eq!(json["Technical Attribute"], 10);
        assert_eq!(json["Problem Solving"], 10);
    }
}
