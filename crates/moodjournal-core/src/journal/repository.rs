//! Entry repository over the `entries` document.
//!
//! Each operation reads the whole list, changes it and writes it back.
//! Nothing serializes two overlapping saves; the later write wins.

use std::path::Path;

use chrono::{DateTime, Utc};

use super::{CustomActivity, JournalEntry};
use crate::error::CoreError;
use crate::storage::{keys, Database, PhotoStore};
use crate::timestamp;

pub struct EntryRepository<'a> {
    db: &'a Database,
    photos: PhotoStore,
}

impl<'a> EntryRepository<'a> {
    pub fn new(db: &'a Database, photos: PhotoStore) -> Self {
        Self { db, photos }
    }

    pub fn photos(&self) -> &PhotoStore {
        &self.photos
    }

    /// All entries in stored order. Read failures yield an empty list.
    pub fn list(&self) -> Vec<JournalEntry> {
        self.db.load_list(keys::ENTRIES)
    }

    pub fn get(&self, id: &str) -> Option<JournalEntry> {
        self.list().into_iter().find(|e| e.id == id)
    }

    fn write(&self, entries: &[JournalEntry]) -> Result<(), CoreError> {
        self.db.store_json(keys::ENTRIES, entries)
    }

    /// Bulk rewrite of the entry list. Failures are logged, not returned.
    pub fn replace_all(&self, entries: &[JournalEntry]) {
        if let Err(e) = self.write(entries) {
            tracing::error!(error = %e, count = entries.len(), "failed to save entries");
        }
    }

    /// Insert or replace by id.
    ///
    /// When replacing, photo files referenced by the old version but not by
    /// the new one are deleted.
    ///
    /// # Errors
    /// Returns a validation error for malformed moods or dates, or a
    /// storage error if the list cannot be written.
    pub fn save(&self, mut entry: JournalEntry) -> Result<JournalEntry, CoreError> {
        entry.normalize()?;
        let mut entries = self.list();

        match entries.iter().position(|e| e.id == entry.id) {
            Some(index) => {
                let new_photos = entry.photos();
                for stale in entries[index]
                    .photos()
                    .iter()
                    .filter(|p| !new_photos.contains(p))
                {
                    self.photos.delete_photo(stale);
                }
                entries[index] = entry.clone();
                tracing::debug!(id = %entry.id, "updated entry");
            }
            None => {
                entries.push(entry.clone());
                tracing::debug!(id = %entry.id, "inserted entry");
            }
        }

        self.write(&entries)?;
        Ok(entry)
    }

    /// Remove an entry and every photo it owns. Unknown ids are a no-op
    /// apart from rewriting the list.
    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut entries = self.list();
        if let Some(entry) = entries.iter().find(|e| e.id == id) {
            for photo in entry.photos() {
                self.photos.delete_photo(photo);
            }
        }
        entries.retain(|e| e.id != id);
        self.write(&entries)
    }

    /// Copy a photo into the journal's photo directory.
    pub fn save_photo(&self, source: &Path) -> Result<String, CoreError> {
        self.photos.save_photo(source)
    }

    pub fn delete_photo(&self, reference: &str) {
        self.photos.delete_photo(reference)
    }

    pub fn find_by_tag(&self, tag: &str) -> Vec<JournalEntry> {
        self.list()
            .into_iter()
            .filter(|e| e.tags().iter().any(|t| t == tag))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<JournalEntry> {
        self.list()
            .into_iter()
            .filter(|e| e.matches_query(query))
            .collect()
    }

    /// Entries whose date falls within `[start, end]`.
    pub fn find_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<JournalEntry> {
        self.list()
            .into_iter()
            .filter(|e| {
                timestamp::parse_iso(&e.date).is_some_and(|d| d >= start && d <= end)
            })
            .collect()
    }

    /// Flip the privacy flag. Returns the new value, or `None` for an
    /// unknown id.
    pub fn toggle_privacy(&self, id: &str) -> Result<Option<bool>, CoreError> {
        let mut entries = self.list();
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        let private = !entry.is_private();
        entry.is_private = Some(private);
        self.write(&entries)?;
        Ok(Some(private))
    }

    pub fn list_custom_activities(&self) -> Vec<CustomActivity> {
        self.db.load_list(keys::CUSTOM_ACTIVITIES)
    }

    pub fn save_custom_activity(&self, activity: CustomActivity) -> Result<(), CoreError> {
        let mut activities = self.list_custom_activities();
        match activities.iter_mut().find(|a| a.id == activity.id) {
            Some(existing) => *existing = activity,
            None => activities.push(activity),
        }
        self.db.store_json(keys::CUSTOM_ACTIVITIES, &activities)
    }

    pub fn delete_custom_activity(&self, id: &str) -> Result<(), CoreError> {
        let mut activities = self.list_custom_activities();
        activities.retain(|a| a.id != id);
        self.db.store_json(keys::CUSTOM_ACTIVITIES, &activities)
    }
}
