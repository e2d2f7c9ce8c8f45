//! Derived analytics views
//!
//! Pure functions over the completed-quest and reflection histories.
//! Nothing here is persisted; it is recomputed after every transition.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::streaks::{completion_days, current_streak, longest_streak};
use crate::domain::{PersonalReflection, Quest, Realm};

/// How many recent reflections feed the mood and motivation views
const RECENT_REFLECTIONS: usize = 7;

/// Totals for a trailing window of days
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub quests_completed: u32,
    pub xp_earned: u64,
    pub active_days: u32,
}

/// Totals for one realm over the whole history
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RealmPerformance {
    pub quests_completed: u32,
    pub xp_earned: u64,
    /// Share of all completions (0.0 - 1.0)
    pub share: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Analytics {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_7_days: PeriodSummary,
    pub last_30_days: PeriodSummary,
    pub realms: BTreeMap<Realm, RealmPerformance>,
    pub reflections_logged: usize,
    pub average_motivation: Option<f32>,
    pub dominant_mood: Option<String>,
}

impl Analytics {
    /// Realm with the most completions, if any
    pub fn strongest_realm(&self) -> Option<Realm> {
        self.realms
            .iter()
            .filter(|(_, perf)| perf.quests_completed > 0)
            .max_by_key(|(_, perf)| perf.quests_completed)
            .map(|(realm, _)| *realm)
    }

    /// Realm with the fewest completions (untouched realms count as zero)
    pub fn weakest_realm(&self) -> Option<Realm> {
        if self.realms.is_empty() {
            return None;
        }
        Realm::ALL.iter().copied().min_by_key(|realm| {
            self.realms
                .get(realm)
                .map(|perf| perf.quests_completed)
                .unwrap_or(0)
        })
    }
}

pub fn compute(
    completed: &[Quest],
    reflections: &[PersonalReflection],
    now: DateTime<Utc>,
) -> Analytics {
    let days = completion_days(completed);

    Analytics {
        current_streak: current_streak(&days, now.date_naive()),
        longest_streak: longest_streak(&days),
        last_7_days: period(completed, now, 7),
        last_30_days: period(completed, now, 30),
        realms: realm_performance(completed),
        reflections_logged: reflections.len(),
        average_motivation: average_motivation(reflections),
        dominant_mood: dominant_mood(reflections),
    }
}

fn period(completed: &[Quest], now: DateTime<Utc>, days: i64) -> PeriodSummary {
    let cutoff = now - Duration::days(days);
    let in_window: Vec<&Quest> = completed
        .iter()
        .filter(|q| q.completed_at.is_some_and(|at| at > cutoff && at <= now))
        .collect();

    let active_days = in_window
        .iter()
        .filter_map(|q| q.completed_at.map(|at| at.date_naive()))
        .collect::<std::collections::BTreeSet<_>>()
        .len() as u32;

    PeriodSummary {
        quests_completed: in_window.len() as u32,
        xp_earned: in_window.iter().map(|q| u64::from(q.xp)).sum(),
        active_days,
    }
}

fn realm_performance(completed: &[Quest]) -> BTreeMap<Realm, RealmPerformance> {
    let mut realms: BTreeMap<Realm, RealmPerformance> = BTreeMap::new();
    for quest in completed {
        let perf = realms.entry(quest.realm).or_default();
        perf.quests_completed += 1;
        perf.xp_earned += u64::from(quest.xp);
    }

    let total = completed.len() as f32;
    for perf in realms.values_mut() {
        perf.share = perf.quests_completed as f32 / total;
    }
    realms
}

/// Reflections are stored newest first
fn average_motivation(reflections: &[PersonalReflection]) -> Option<f32> {
    let recent: Vec<u8> = reflections
        .iter()
        .take(RECENT_REFLECTIONS)
        .map(|r| r.motivation_level)
        .collect();
    if recent.is_empty() {
        return None;
    }
    let sum: u32 = recent.iter().map(|v| u32::from(*v)).sum();
    Some(sum as f32 / recent.len() as f32)
}

/// Most frequent mood among recent reflections; ties go to the newest
fn dominant_mood(reflections: &[PersonalReflection]) -> Option<String> {
    let recent = &reflections[..reflections.len().min(RECENT_REFLECTIONS)];
    let mut counts: HashMap<String, usize> = HashMap::new();
    for r in recent {
        *counts.entry(r.mood.trim().to_lowercase()).or_insert(0) += 1;
    }
    let best = counts.values().copied().max()?;
    recent
        .iter()
        .map(|r| r.mood.trim().to_lowercase())
        .find(|mood| counts.get(mood) == Some(&best))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Difficulty, QuestDraft, QuestType};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 30, 18, 0, 0).unwrap()
    }

    fn done(realm: Realm, difficulty: Difficulty, days_ago: i64) -> Quest {
        let at = now() - Duration::days(days_ago);
        let draft = QuestDraft::new("q", QuestType::Normal, difficulty, realm);
        let mut quest = Quest::from_draft(draft, format!("{}-{}", days_ago, realm), at);
        quest.completed = true;
        quest.completed_at = Some(at);
        quest
    }

    fn reflection(mood: &str, motivation: u8) -> PersonalReflection {
        PersonalReflection {
            mood: mood.into(),
            emotional_state: String::new(),
            current_challenges: String::new(),
            motivation_level: motivation,
            notes: None,
            timestamp: now(),
        }
    }

    #[test]
    fn test_empty_history() {
        let analytics = compute(&[], &[], now());
        assert_eq!(analytics, Analytics::default());
        assert_eq!(analytics.strongest_realm(), None);
    }

    #[test]
    fn test_period_windows() {
        let completed = vec![
            done(Realm::MindSkill, Difficulty::Easy, 0),
            done(Realm::MindSkill, Difficulty::Hard, 1),
            done(Realm::BodyDiscipline, Difficulty::Medium, 10),
            done(Realm::BodyDiscipline, Difficulty::Medium, 45),
        ];
        let analytics = compute(&completed, &[], now());
        assert_eq!(analytics.last_7_days.quests_completed, 2);
        assert_eq!(analytics.last_7_days.xp_earned, 60);
        assert_eq!(analytics.last_7_days.active_days, 2);
        assert_eq!(analytics.last_30_days.quests_completed, 3);
        assert_eq!(analytics.current_streak, 2);
    }

    #[test]
    fn test_realm_shares() {
        let completed = vec![
            done(Realm::HeartLoyalty, Difficulty::Easy, 0),
            done(Realm::HeartLoyalty, Difficulty::Easy, 1),
            done(Realm::CreationMission, Difficulty::Easy, 2),
            done(Realm::MindSkill, Difficulty::Easy, 3),
        ];
        let analytics = compute(&completed, &[], now());
        let heart = analytics.realms[&Realm::HeartLoyalty];
        assert_eq!(heart.quests_completed, 2);
        assert!((heart.share - 0.5).abs() < f32::EPSILON);
        assert_eq!(analytics.strongest_realm(), Some(Realm::HeartLoyalty));
        assert_eq!(analytics.weakest_realm(), Some(Realm::EmotionalSpiritual));
    }

    #[test]
    fn test_mood_and_motivation() {
        let reflections = vec![
            reflection("Calm", 8),
            reflection("tired", 4),
            reflection("calm ", 6),
        ];
        let analytics = compute(&[], &reflections, now());
        assert_eq!(analytics.reflections_logged, 3);
        assert_eq!(analytics.dominant_mood.as_deref(), Some("calm"));
        assert!((analytics.average_motivation.unwrap() - 6.0).abs() < 0.01);
    }
}
