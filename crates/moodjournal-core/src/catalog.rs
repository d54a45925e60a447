//! Static mood and activity tables.
//!
//! Mood labels are stored on entries as plain strings; these tables give
//! them a category, an emoji and a colour. Activities work the same way
//! with ids and icon names.

use serde::{Deserialize, Serialize};

use crate::journal::CustomActivity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodCategory {
    Positive,
    Neutral,
    Negative,
}

impl MoodCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodCategory::Positive => "Positive",
            MoodCategory::Neutral => "Neutral",
            MoodCategory::Negative => "Negative",
        }
    }
}

/// A selectable mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mood {
    pub label: &'static str,
    pub emoji: &'static str,
    pub color: &'static str,
    pub category: MoodCategory,
}

const fn mood(
    label: &'static str,
    emoji: &'static str,
    color: &'static str,
    category: MoodCategory,
) -> Mood {
    Mood {
        label,
        emoji,
        color,
        category,
    }
}

pub const MOODS: &[Mood] = &[
    mood("Happy", "😀", "#FFD700", MoodCategory::Positive),
    mood("Excited", "🤩", "#FF8C00", MoodCategory::Positive),
    mood("Calm", "😌", "#ADD8E6", MoodCategory::Positive),
    mood("Grateful", "🙏", "#FFE4B5", MoodCategory::Positive),
    mood("Loved", "❤️", "#FF69B4", MoodCategory::Positive),
    mood("Energetic", "⚡", "#00FF00", MoodCategory::Positive),
    mood("Hopeful", "🌈", "#87CEEB", MoodCategory::Positive),
    mood("Proud", "🏆", "#DAA520", MoodCategory::Positive),
    mood("Okay", "🙂", "#D3D3D3", MoodCategory::Neutral),
    mood("Tired", "😴", "#B0C4DE", MoodCategory::Neutral),
    mood("Bored", "😐", "#CCCCCC", MoodCategory::Neutral),
    mood("Reflective", "🤔", "#C0C0C0", MoodCategory::Neutral),
    mood("Meh", "😑", "#A9A9A9", MoodCategory::Neutral),
    mood("Sad", "😢", "#1E90FF", MoodCategory::Negative),
    mood("Anxious", "😰", "#FF6347", MoodCategory::Negative),
    mood("Angry", "😠", "#FF4500", MoodCategory::Negative),
    mood("Frustrated", "😤", "#DC143C", MoodCategory::Negative),
    mood("Lonely", "😔", "#708090", MoodCategory::Negative),
    mood("Overwhelmed", "😩", "#8B0000", MoodCategory::Negative),
    mood("Stressed", "😣", "#A52A2A", MoodCategory::Negative),
    mood("Confused", "😕", "#9370DB", MoodCategory::Negative),
];

/// Maximum number of moods on a single entry.
pub const MAX_MOODS_PER_ENTRY: usize = 3;

impl Mood {
    /// Exact, case-sensitive lookup.
    pub fn from_label(label: &str) -> Option<&'static Mood> {
        MOODS.iter().find(|m| m.label == label)
    }

    pub fn in_category(category: MoodCategory) -> impl Iterator<Item = &'static Mood> {
        MOODS.iter().filter(move |m| m.category == category)
    }
}

pub fn mood_category(label: &str) -> Option<MoodCategory> {
    Mood::from_label(label).map(|m| m.category)
}

/// Whether a mood label counts towards a streak.
pub fn is_positive(label: &str) -> bool {
    mood_category(label) == Some(MoodCategory::Positive)
}

pub fn mood_color(label: &str) -> Option<&'static str> {
    Mood::from_label(label).map(|m| m.color)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityCategory {
    #[serde(rename = "Self Care")]
    SelfCare,
    Social,
    Work,
    Entertainment,
    Health,
}

impl ActivityCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityCategory::SelfCare => "Self Care",
            ActivityCategory::Social => "Social",
            ActivityCategory::Work => "Work",
            ActivityCategory::Entertainment => "Entertainment",
            ActivityCategory::Health => "Health",
        }
    }
}

/// A built-in activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Activity {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub category: ActivityCategory,
}

const fn activity(
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    category: ActivityCategory,
) -> Activity {
    Activity {
        id,
        name,
        icon,
        category,
    }
}

pub const ACTIVITIES: &[Activity] = &[
    activity("sleep", "Sleep", "bed", ActivityCategory::SelfCare),
    activity("exercise", "Exercise", "fitness", ActivityCategory::SelfCare),
    activity("meditation", "Meditation", "leaf", ActivityCategory::SelfCare),
    activity("reading", "Reading", "book", ActivityCategory::SelfCare),
    activity("friends", "Friends", "people", ActivityCategory::Social),
    activity("family", "Family", "home", ActivityCategory::Social),
    activity("date", "Date", "heart", ActivityCategory::Social),
    activity("party", "Party", "wine", ActivityCategory::Social),
    activity("work", "Work", "briefcase", ActivityCategory::Work),
    activity("study", "Study", "school", ActivityCategory::Work),
    activity("meeting", "Meeting", "people-circle", ActivityCategory::Work),
    activity("coding", "Coding", "code-slash", ActivityCategory::Work),
    activity("movies", "Movies", "film", ActivityCategory::Entertainment),
    activity("gaming", "Gaming", "game-controller", ActivityCategory::Entertainment),
    activity("music", "Music", "musical-notes", ActivityCategory::Entertainment),
    activity("shopping", "Shopping", "cart", ActivityCategory::Entertainment),
    activity("doctor", "Doctor", "medical", ActivityCategory::Health),
    activity("therapy", "Therapy", "heart-half", ActivityCategory::Health),
    activity("workout", "Workout", "barbell", ActivityCategory::Health),
    activity("yoga", "Yoga", "body", ActivityCategory::Health),
];

const FALLBACK_ICON: &str = "ellipse";

impl Activity {
    pub fn from_id(id: &str) -> Option<&'static Activity> {
        ACTIVITIES.iter().find(|a| a.id == id)
    }
}

/// Icon for an activity id, checking built-ins first and then the user's
/// custom activities.
pub fn activity_icon<'a>(id: &str, custom: &'a [CustomActivity]) -> &'a str {
    if let Some(a) = Activity::from_id(id) {
        return a.icon;
    }
    custom
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.icon.as_str())
        .unwrap_or(FALLBACK_ICON)
}

/// Display name for an activity id; unknown ids are returned unchanged.
pub fn activity_name<'a>(id: &'a str, custom: &'a [CustomActivity]) -> &'a str {
    if let Some(a) = Activity::from_id(id) {
        return a.name;
    }
    custom
        .iter()
        .find(|c| c.id == id)
        .map(|c| c.name.as_str())
        .unwrap_or(id)
}
