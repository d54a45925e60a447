//! Journal entries and custom activities.
//!
//! Field names serialize in camelCase so the stored `entries` document
//! keeps the shape older clients wrote.

mod repository;

pub use repository::EntryRepository;

use serde::{Deserialize, Serialize};

use crate::catalog::MAX_MOODS_PER_ENTRY;
use crate::error::ValidationError;
use crate::timestamp;

/// One mood on an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodData {
    pub mood: String,
    /// 1..=5
    pub intensity: u8,
    pub primary: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

/// A dated journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: String,
    /// ISO-8601 date-time.
    pub date: String,
    /// Legacy single-mood field; mirrors `moods[0].mood` when `moods` is set.
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub moods: Vec<MoodData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activities: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photos: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    /// Legacy single-intensity field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<u8>,
}

impl JournalEntry {
    /// New entry dated now with a fresh id and a single primary mood.
    pub fn new(mood: impl Into<String>, intensity: u8) -> Self {
        let mood = mood.into();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: timestamp::now_iso(),
            mood: mood.clone(),
            moods: vec![MoodData {
                mood,
                intensity,
                primary: true,
            }],
            note: None,
            activities: None,
            voice_note: None,
            photos: None,
            location: None,
            tags: None,
            is_private: None,
            intensity: Some(intensity),
        }
    }

    pub fn photos(&self) -> &[String] {
        self.photos.as_deref().unwrap_or(&[])
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    pub fn activities(&self) -> &[String] {
        self.activities.as_deref().unwrap_or(&[])
    }

    pub fn is_private(&self) -> bool {
        self.is_private.unwrap_or(false)
    }

    /// The mood flagged primary, falling back to the first one.
    pub fn primary_mood(&self) -> Option<&MoodData> {
        self.moods
            .iter()
            .find(|m| m.primary)
            .or_else(|| self.moods.first())
    }

    /// Check the mood invariants and mirror the first mood into the legacy
    /// field.
    pub fn normalize(&mut self) -> Result<(), ValidationError> {
        if self.moods.is_empty() && self.mood.trim().is_empty() {
            return Err(ValidationError::MissingMood);
        }
        if self.moods.len() > MAX_MOODS_PER_ENTRY {
            return Err(ValidationError::TooManyMoods {
                count: self.moods.len(),
                max: MAX_MOODS_PER_ENTRY,
            });
        }
        if let Some(bad) = self.moods.iter().find(|m| !(1..=5).contains(&m.intensity)) {
            return Err(ValidationError::IntensityOutOfRange {
                mood: bad.mood.clone(),
                intensity: bad.intensity,
            });
        }
        if timestamp::parse_iso(&self.date).is_none() {
            return Err(ValidationError::InvalidDate(self.date.clone()));
        }
        if let Some(first) = self.moods.first() {
            self.mood = first.mood.clone();
        }
        Ok(())
    }

    /// Case-insensitive substring match over note, moods, tags and place.
    pub fn matches_query(&self, query: &str) -> bool {
        let q = query.to_lowercase();
        let hit = |s: &str| s.to_lowercase().contains(&q);

        self.note.as_deref().is_some_and(hit)
            || hit(&self.mood)
            || self.moods.iter().any(|m| hit(&m.mood))
            || self.tags().iter().any(|t| hit(t))
            || self.location.as_ref().is_some_and(|l| hit(&l.name))
    }
}

/// A user-defined activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomActivity {
    pub id: String,
    pub name: String,
    pub icon: String,
    pub category: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mood(label: &str, intensity: u8) -> MoodData {
        MoodData {
            mood: label.into(),
            intensity,
            primary: false,
        }
    }

    #[test]
    fn normalize_mirrors_first_mood() {
        let mut entry = JournalEntry::new("Sad", 2);
        entry.moods = vec![mood("Calm", 3), mood("Tired", 2)];
        entry.normalize().unwrap();
        assert_eq!(entry.mood, "Calm");
    }

    #[test]
    fn normalize_rejects_fourth_mood() {
        let mut entry = JournalEntry::new("Happy", 3);
        entry.moods = vec![mood("Happy", 3), mood("Calm", 3), mood("Tired", 2), mood("Sad", 1)];
        assert_eq!(
            entry.normalize(),
            Err(ValidationError::TooManyMoods { count: 4, max: 3 })
        );
    }

    #[test]
    fn normalize_rejects_bad_intensity() {
        let mut entry = JournalEntry::new("Happy", 0);
        assert!(matches!(
            entry.normalize(),
            Err(ValidationError::IntensityOutOfRange { intensity: 0, .. })
        ));
        entry.moods[0].intensity = 6;
        assert!(entry.normalize().is_err());
    }

    #[test]
    fn normalize_requires_some_mood() {
        let mut entry = JournalEntry::new("Happy", 3);
        entry.moods.clear();
        entry.mood.clear();
        assert_eq!(entry.normalize(), Err(ValidationError::MissingMood));

        // Legacy-only entries are still valid.
        entry.mood = "Okay".into();
        assert!(entry.normalize().is_ok());
        assert_eq!(entry.mood, "Okay");
    }

    #[test]
    fn legacy_document_without_moods_parses() {
        let json = r#"{"id":"1","date":"2024-01-01T10:00:00.000Z","mood":"Happy"}"#;
        let entry: JournalEntry = serde_json::from_str(json).unwrap();
        assert!(entry.moods.is_empty());
        assert!(entry.photos().is_empty());
        assert!(!entry.is_private());
    }

    #[test]
    fn empty_optionals_are_omitted() {
        let entry = JournalEntry::new("Happy", 4);
        let json = serde_json::to_value(&entry).unwrap();
        let obj = json.as_object().unwrap();
        assert!(!obj.contains_key("note"));
        assert!(!obj.contains_key("voiceNote"));
        assert!(obj.contains_key("moods"));
    }

    #[test]
    fn query_matches_every_searchable_field() {
        let mut entry = JournalEntry::new("Grateful", 4);
        entry.note = Some("Long walk by the River".into());
        entry.tags = Some(vec!["weekend".into()]);
        entry.location = Some(Location {
            latitude: 1.0,
            longitude: 2.0,
            name: "Central Park".into(),
        });

        assert!(entry.matches_query("river"));
        assert!(entry.matches_query("GRATE"));
        assert!(entry.matches_query("Weekend"));
        assert!(entry.matches_query("park"));
        assert!(!entry.matches_query("office"));
    }
}
