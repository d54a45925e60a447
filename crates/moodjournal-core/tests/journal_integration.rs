//! Integration tests for the journal workflow.
//!
//! These tests drive entries, photos, goals, streaks and reminders through
//! a file-backed store, the way the CLI does across invocations.

use moodjournal_core::notifications::{KvNotificationQueue, NotificationService};
use moodjournal_core::{
    compute_streak, Database, EntryRepository, Goal, GoalCategory, GoalRepository, JournalEntry,
    MoodData, PhotoStore, ReminderScheduler,
};
use tempfile::TempDir;

fn entry_on(day: &str, mood: &str) -> JournalEntry {
    let mut e = JournalEntry::new(mood, 4);
    e.date = format!("{day}T09:00:00.000Z");
    e
}

#[test]
fn test_entries_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("journal.db");

    let mut entry = entry_on("2024-05-01", "Grateful");
    entry.moods.push(MoodData {
        mood: "Tired".into(),
        intensity: 2,
        primary: false,
    });
    entry.tags = Some(vec!["family".into()]);
    {
        let db = Database::open_at(&db_path).unwrap();
        let repo = EntryRepository::new(&db, PhotoStore::new(dir.path().join("photos")));
        repo.save(entry.clone()).unwrap();
    }

    let db = Database::open_at(&db_path).unwrap();
    let repo = EntryRepository::new(&db, PhotoStore::new(dir.path().join("photos")));
    assert_eq!(repo.list(), vec![entry]);
}

#[test]
fn test_photo_lifecycle_through_repository() {
    let dir = TempDir::new().unwrap();
    let camera = dir.path().join("camera.jpg");
    std::fs::write(&camera, b"jpeg").unwrap();

    let db = Database::open_memory().unwrap();
    let repo = EntryRepository::new(&db, PhotoStore::new(dir.path().join("journal_photos")));

    let first = repo.save_photo(&camera).unwrap();
    let second = repo.save_photo(&camera).unwrap();
    let mut entry = entry_on("2024-05-01", "Happy");
    entry.photos = Some(vec![first.clone(), second.clone()]);
    let entry = repo.save(entry).unwrap();

    let mut edited = entry.clone();
    edited.photos = Some(vec![second.clone()]);
    repo.save(edited).unwrap();
    assert!(!std::path::Path::new(&first).exists());
    assert!(std::path::Path::new(&second).exists());

    repo.delete(&entry.id).unwrap();
    assert!(!std::path::Path::new(&second).exists());
    assert!(camera.exists());
}

#[test]
fn test_streak_over_saved_entries() {
    let db = Database::open_memory().unwrap();
    let dir = TempDir::new().unwrap();
    let repo = EntryRepository::new(&db, PhotoStore::new(dir.path()));
    for (day, mood) in [
        ("2024-05-03", "Happy"),
        ("2024-05-02", "Proud"),
        ("2024-05-01", "Hopeful"),
        ("2024-04-30", "Anxious"),
        ("2024-04-29", "Happy"),
    ] {
        repo.save(entry_on(day, mood)).unwrap();
    }

    let streak = compute_streak(&repo.list());
    assert_eq!(streak.count, 3);
    assert_eq!(streak.dates[0], "2024-05-03T09:00:00.000Z");
}

#[test]
fn test_goal_reminders_follow_goal_state() {
    let db = Database::open_memory().unwrap();
    let goals = GoalRepository::new(&db);
    let goal = goals
        .save(Goal::new("Walk daily", GoalCategory::PhysicalHealth))
        .unwrap();

    let mut scheduler = ReminderScheduler::new(KvNotificationQueue::new(&db));
    scheduler.sync_goal(&goal).unwrap();
    assert_eq!(
        scheduler.service().scheduled_identifiers().unwrap(),
        [format!("goal-reminder-{}", goal.id)]
    );

    let finished = goals.update_progress(&goal.id, 100).unwrap().unwrap();
    scheduler.sync_goal(&finished).unwrap();
    assert!(KvNotificationQueue::new(&db).pending().is_empty());
}
