//! Consecutive-day positive-mood streak.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::is_positive;
use crate::journal::JournalEntry;
use crate::timestamp::{self, MS_PER_DAY};

/// Result of a streak walk.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streak {
    pub count: usize,
    /// Dates of the streak entries, most recent first.
    pub dates: Vec<String>,
}

/// Walk entries from the most recent backwards.
///
/// An entry extends the streak only if its mood is positive and it is
/// exactly one day (in milliseconds) before the previously accepted
/// entry. Two entries on the same day break the streak; an entry whose
/// date cannot be parsed ends it as well.
pub fn compute_streak(entries: &[JournalEntry]) -> Streak {
    let mut sorted: Vec<(Option<DateTime<Utc>>, &JournalEntry)> = entries
        .iter()
        .map(|e| (timestamp::parse_iso(&e.date), e))
        .collect();
    // Descending; `None` sorts below every parsed date.
    sorted.sort_by(|a, b| b.0.cmp(&a.0));

    let mut streak = Streak::default();
    let mut previous: Option<DateTime<Utc>> = None;

    for (parsed, entry) in sorted {
        if !is_positive(streak_mood(entry)) {
            break;
        }
        let Some(date) = parsed else {
            break;
        };
        if let Some(prev) = previous {
            let diff = (prev - date).num_milliseconds() as f64 / MS_PER_DAY as f64;
            if diff != 1.0 {
                break;
            }
        }
        streak.count += 1;
        streak.dates.push(entry.date.clone());
        previous = Some(date);
    }

    streak
}

fn streak_mood(entry: &JournalEntry) -> &str {
    if entry.mood.is_empty() {
        entry.primary_mood().map(|m| m.mood.as_str()).unwrap_or("")
    } else {
        &entry.mood
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, mood: &str) -> JournalEntry {
        let mut e = JournalEntry::new(mood, 3);
        e.date = date.into();
        e
    }

    #[test]
    fn empty_list_has_no_streak() {
        assert_eq!(compute_streak(&[]), Streak::default());
    }

    #[test]
    fn most_recent_negative_means_zero() {
        let entries = [
            entry("2024-03-03T09:00:00.000Z", "Sad"),
            entry("2024-03-02T09:00:00.000Z", "Happy"),
            entry("2024-03-01T09:00:00.000Z", "Happy"),
        ];
        assert_eq!(compute_streak(&entries).count, 0);
    }

    #[test]
    fn three_consecutive_days() {
        // Deliberately unsorted.
        let entries = [
            entry("2024-03-02T09:00:00.000Z", "Calm"),
            entry("2024-03-03T09:00:00.000Z", "Happy"),
            entry("2024-03-01T09:00:00.000Z", "Grateful"),
        ];
        let streak = compute_streak(&entries);
        assert_eq!(streak.count, 3);
        assert_eq!(
            streak.dates,
            [
                "2024-03-03T09:00:00.000Z",
                "2024-03-02T09:00:00.000Z",
                "2024-03-01T09:00:00.000Z"
            ]
        );
    }

    #[test]
    fn two_day_gap_breaks() {
        let entries = [
            entry("2024-03-03T09:00:00.000Z", "Happy"),
            entry("2024-03-01T09:00:00.000Z", "Happy"),
        ];
        assert_eq!(compute_streak(&entries).count, 1);
    }

    #[test]
    fn different_time_of_day_breaks() {
        let entries = [
            entry("2024-03-03T09:00:00.000Z", "Happy"),
            entry("2024-03-02T08:00:00.000Z", "Happy"),
        ];
        assert_eq!(compute_streak(&entries).count, 1);
    }

    #[test]
    fn same_day_duplicates_break() {
        let entries = [
            entry("2024-03-03T20:00:00.000Z", "Happy"),
            entry("2024-03-03T09:00:00.000Z", "Happy"),
            entry("2024-03-02T20:00:00.000Z", "Happy"),
        ];
        assert_eq!(compute_streak(&entries).count, 1);
    }

    #[test]
    fn unparseable_date_ends_streak() {
        let entries = [
            entry("2024-03-03T09:00:00.000Z", "Happy"),
            entry("not a date", "Happy"),
        ];
        assert_eq!(compute_streak(&entries).count, 1);
    }
}
