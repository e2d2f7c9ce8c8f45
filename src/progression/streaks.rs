//! Streak tracking
//!
//! A streak counts consecutive calendar days (UTC) with at least one
//! completed quest. It stays alive until a full day is missed: activity
//! yesterday but not yet today still counts.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};

use crate::domain::Quest;

/// Distinct days on which quests were completed
pub fn completion_days(completed: &[Quest]) -> BTreeSet<NaiveDate> {
    completed
        .iter()
        .filter_map(|q| q.completed_at)
        .map(|at| at.date_naive())
        .collect()
}

/// Length of the run ending today or yesterday (0 if broken)
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let Some(last) = days.iter().next_back().copied() else {
        return 0;
    };
    if (today - last).num_days() > 1 {
        return 0;
    }

    let mut count = 0;
    let mut day = last;
    while days.contains(&day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}

/// Longest run of consecutive days anywhere in the history
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut best = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;
    for day in days {
        run = match previous {
            Some(prev) if (*day - prev).num_days() == 1 => run + 1,
            _ => 1,
        };
        best = best.max(run);
        previous = Some(*day);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, day).unwrap()
    }

    #[test]
    fn test_empty_history() {
        let days = BTreeSet::new();
        assert_eq!(current_streak(&days, d(10)), 0);
        assert_eq!(longest_streak(&days), 0);
    }

    #[test]
    fn test_streak_alive_through_yesterday() {
        let days: BTreeSet<_> = [d(7), d(8), d(9)].into_iter().collect();
        assert_eq!(current_streak(&days, d(9)), 3);
        assert_eq!(current_streak(&days, d(10)), 3);
        assert_eq!(current_streak(&days, d(11)), 0);
    }

    #[test]
    fn test_gap_breaks_run() {
        let days: BTreeSet<_> = [d(1), d(2), d(3), d(4), d(6), d(7)].into_iter().collect();
        assert_eq!(current_streak(&days, d(7)), 2);
        assert_eq!(longest_streak(&days), 4);
    }
}
