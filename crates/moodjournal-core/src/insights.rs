//! Aggregate views over the entry list.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::catalog::mood_color;
use crate::error::ValidationError;
use crate::journal::JournalEntry;
use crate::timestamp;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodShare {
    pub mood: String,
    pub count: usize,
    /// Share of entries carrying a mood, 0.0..=100.0.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityCount {
    pub activity: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarDay {
    pub day: u32,
    /// `YYYY-MM-DD`
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One month laid out on a Sunday-first grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthCalendar {
    pub year: i32,
    pub month: u32,
    /// Empty cells before the 1st (Sunday = 0).
    pub leading_blanks: u32,
    pub days: Vec<CalendarDay>,
}

fn label(entry: &JournalEntry) -> Option<&str> {
    if !entry.mood.is_empty() {
        return Some(&entry.mood);
    }
    entry.primary_mood().map(|m| m.mood.as_str())
}

/// Count of each mood label, most common first (ties by label).
pub fn mood_distribution(entries: &[JournalEntry]) -> Vec<MoodShare> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for mood in entries.iter().filter_map(label) {
        *counts.entry(mood).or_default() += 1;
    }
    let total: usize = counts.values().sum();

    let mut shares: Vec<MoodShare> = counts
        .into_iter()
        .map(|(mood, count)| MoodShare {
            mood: mood.to_string(),
            count,
            percentage: count as f64 / total as f64 * 100.0,
        })
        .collect();
    shares.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.mood.cmp(&b.mood)));
    shares
}

/// Most frequent activity ids, truncated to `limit`.
pub fn top_activities(entries: &[JournalEntry], limit: usize) -> Vec<ActivityCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for activity in entries.iter().flat_map(|e| e.activities()).map(String::as_str) {
        *counts.entry(activity).or_default() += 1;
    }
    let mut top: Vec<ActivityCount> = counts
        .into_iter()
        .map(|(activity, count)| ActivityCount {
            activity: activity.to_string(),
            count,
        })
        .collect();
    top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.activity.cmp(&b.activity)));
    top.truncate(limit);
    top
}

/// Calendar for `month` (1-12) of `year`. Each day shows the first entry
/// in list order whose date starts with that day.
pub fn mood_calendar(
    entries: &[JournalEntry],
    year: i32,
    month: u32,
) -> Result<MonthCalendar, ValidationError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ValidationError::InvalidDate(format!("{year}-{month:02}")))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ValidationError::InvalidDate(format!("{year}-{month:02}")))?;
    let days_in_month = (next - first).num_days() as u32;

    let days = (1..=days_in_month)
        .map(|day| {
            let date = format!("{year:04}-{month:02}-{day:02}");
            let entry = entries
                .iter()
                .find(|e| timestamp::day_prefix(&e.date) == date);
            let mood = entry.and_then(label).map(str::to_string);
            CalendarDay {
                day,
                color: mood.as_deref().and_then(mood_color).map(str::to_string),
                entry_id: entry.map(|e| e.id.clone()),
                mood,
                date,
            }
        })
        .collect();

    Ok(MonthCalendar {
        year,
        month,
        leading_blanks: first.weekday().num_days_from_sunday(),
        days,
    })
}

/// Mean primary-mood intensity, falling back to the legacy field.
pub fn average_intensity(entries: &[JournalEntry]) -> Option<f64> {
    let values: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.primary_mood().map(|m| m.intensity).or(e.intensity))
        .map(f64::from)
        .collect();
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, date: &str, mood: &str, intensity: u8) -> JournalEntry {
        let mut e = JournalEntry::new(mood, intensity);
        e.id = id.into();
        e.date = date.into();
        e
    }

    #[test]
    fn distribution_orders_by_count_then_label() {
        let entries = [
            entry("1", "2024-01-01T00:00:00.000Z", "Sad", 2),
            entry("2", "2024-01-02T00:00:00.000Z", "Happy", 4),
            entry("3", "2024-01-03T00:00:00.000Z", "Happy", 5),
            entry("4", "2024-01-04T00:00:00.000Z", "Calm", 3),
        ];
        let dist = mood_distribution(&entries);
        let labels: Vec<_> = dist.iter().map(|s| s.mood.as_str()).collect();
        assert_eq!(labels, ["Happy", "Calm", "Sad"]);
        assert_eq!(dist[0].count, 2);
        assert!((dist[0].percentage - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_activities_truncates() {
        let mut a = entry("1", "2024-01-01T00:00:00.000Z", "Happy", 3);
        a.activities = Some(vec!["yoga".into(), "work".into()]);
        let mut b = entry("2", "2024-01-02T00:00:00.000Z", "Happy", 3);
        b.activities = Some(vec!["yoga".into(), "music".into()]);

        let top = top_activities(&[a, b], 2);
        assert_eq!(
            top,
            [
                ActivityCount { activity: "yoga".into(), count: 2 },
                ActivityCount { activity: "music".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn calendar_leading_blanks_match_first_weekday() {
        // 2024-09-01 is a Sunday, 2024-02-01 a Thursday.
        assert_eq!(mood_calendar(&[], 2024, 9).unwrap().leading_blanks, 0);
        let feb = mood_calendar(&[], 2024, 2).unwrap();
        assert_eq!(feb.leading_blanks, 4);
        assert_eq!(feb.days.len(), 29);
        assert!(mood_calendar(&[], 2024, 13).is_err());
    }

    #[test]
    fn calendar_uses_first_matching_entry() {
        let entries = [
            entry("a", "2024-02-10T08:00:00.000Z", "Sad", 2),
            entry("b", "2024-02-10T20:00:00.000Z", "Happy", 4),
        ];
        let cal = mood_calendar(&entries, 2024, 2).unwrap();
        let tenth = &cal.days[9];
        assert_eq!(tenth.date, "2024-02-10");
        assert_eq!(tenth.entry_id.as_deref(), Some("a"));
        assert_eq!(tenth.color.as_deref(), Some("#1E90FF"));
        assert!(cal.days[10].entry_id.is_none());
    }

    #[test]
    fn average_intensity_of_primary_moods() {
        let entries = [
            entry("1", "2024-01-01T00:00:00.000Z", "Happy", 4),
            entry("2", "2024-01-02T00:00:00.000Z", "Sad", 1),
        ];
        assert_eq!(average_intensity(&entries), Some(2.5));
        assert_eq!(average_intensity(&[]), None);
    }
}
