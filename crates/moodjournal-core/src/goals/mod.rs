//! Self-improvement goals.

mod repository;

pub use repository::GoalRepository;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::timestamp;

/// Goal category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GoalCategory {
    #[serde(rename = "Mental Health")]
    MentalHealth,
    #[serde(rename = "Physical Health")]
    PhysicalHealth,
    Social,
    #[serde(rename = "Personal Growth")]
    PersonalGrowth,
    Work,
}

impl GoalCategory {
    pub const ALL: [GoalCategory; 5] = [
        GoalCategory::MentalHealth,
        GoalCategory::PhysicalHealth,
        GoalCategory::Social,
        GoalCategory::PersonalGrowth,
        GoalCategory::Work,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GoalCategory::MentalHealth => "Mental Health",
            GoalCategory::PhysicalHealth => "Physical Health",
            GoalCategory::Social => "Social",
            GoalCategory::PersonalGrowth => "Personal Growth",
            GoalCategory::Work => "Work",
        }
    }
}

impl fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalCategory {
    type Err = ValidationError;

    /// Accepts the display name or a compact form (`mental-health`,
    /// `personalgrowth`), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        GoalCategory::ALL
            .into_iter()
            .find(|c| c.as_str().replace(' ', "").to_lowercase() == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "category".into(),
                message: format!("unknown goal category '{s}'"),
            })
    }
}

/// Time of day for a daily reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderTime {
    pub hour: u8,
    pub minute: u8,
}

impl ReminderTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidReminderTime { hour, minute });
        }
        Ok(Self { hour, minute })
    }
}

impl Default for ReminderTime {
    fn default() -> Self {
        Self { hour: 10, minute: 0 }
    }
}

impl fmt::Display for ReminderTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ReminderTime {
    type Err = ValidationError;

    /// Parses `HH:MM`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidValue {
            field: "reminderTime".into(),
            message: format!("expected HH:MM, got '{s}'"),
        };
        let (h, m) = s.trim().split_once(':').ok_or_else(invalid)?;
        let hour = h.parse().map_err(|_| invalid())?;
        let minute = m.parse().map_err(|_| invalid())?;
        ReminderTime::new(hour, minute)
    }
}

fn default_true() -> bool {
    true
}

/// A tracked goal.
///
/// `completed` is true exactly when `progress` is 100; every repository
/// mutator keeps the two in step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub category: GoalCategory,
    /// 0..=100
    pub progress: u8,
    pub completed: bool,
    pub created_at: String,
    pub updated_at: String,
    #[serde(default = "default_true")]
    pub notification_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<ReminderTime>,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Goal {
    pub fn new(title: impl Into<String>, category: GoalCategory) -> Self {
        let now = timestamp::now_iso();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            category,
            progress: 0,
            completed: false,
            created_at: now.clone(),
            updated_at: now,
            notification_enabled: true,
            reminder_time: None,
            activities: Vec::new(),
            description: None,
        }
    }

    /// Set progress clamped to 0..=100 and derive completion from it.
    pub fn set_progress(&mut self, progress: i32) {
        self.progress = progress.clamp(0, 100) as u8;
        self.completed = self.progress == 100;
    }

    /// Flip completion. Completing forces progress to 100; un-completing a
    /// goal sitting at 100 drops it back one step to 90.
    ///
    /// Older clients left progress at 100 when un-completing, which stored
    /// `completed: false` next to `progress: 100`. Dropping to 90 keeps
    /// `completed` equal to `progress == 100` for every stored goal.
    pub fn toggle_completion(&mut self) {
        self.completed = !self.completed;
        if self.completed {
            self.progress = 100;
        } else if self.progress == 100 {
            self.progress = 90;
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = timestamp::now_iso();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_display_and_compact_names() {
        assert_eq!("Mental Health".parse::<GoalCategory>().unwrap(), GoalCategory::MentalHealth);
        assert_eq!("personal-growth".parse::<GoalCategory>().unwrap(), GoalCategory::PersonalGrowth);
        assert_eq!("work".parse::<GoalCategory>().unwrap(), GoalCategory::Work);
        assert!("hobby".parse::<GoalCategory>().is_err());
    }

    #[test]
    fn category_serializes_with_spaces() {
        let json = serde_json::to_string(&GoalCategory::PhysicalHealth).unwrap();
        assert_eq!(json, "\"Physical Health\"");
    }

    #[test]
    fn reminder_time_bounds() {
        assert!(ReminderTime::new(23, 59).is_ok());
        assert_eq!(
            ReminderTime::new(24, 0),
            Err(ValidationError::InvalidReminderTime { hour: 24, minute: 0 })
        );
        assert!("07:60".parse::<ReminderTime>().is_err());
        assert_eq!("7:05".parse::<ReminderTime>().unwrap().to_string(), "07:05");
        assert!("noon".parse::<ReminderTime>().is_err());
    }

    #[test]
    fn progress_and_completion_stay_consistent() {
        let mut goal = Goal::new("Meditate", GoalCategory::MentalHealth);
        goal.set_progress(150);
        assert_eq!((goal.progress, goal.completed), (100, true));
        goal.set_progress(-10);
        assert_eq!((goal.progress, goal.completed), (0, false));

        goal.set_progress(40);
        goal.toggle_completion();
        assert_eq!((goal.progress, goal.completed), (100, true));
        goal.toggle_completion();
        assert_eq!((goal.progress, goal.completed), (90, false));
    }

    #[test]
    fn missing_notification_flag_defaults_on() {
        let json = r#"{"id":"g","title":"Run","category":"Physical Health","progress":0,
            "completed":false,"createdAt":"2024-01-01T00:00:00.000Z",
            "updatedAt":"2024-01-01T00:00:00.000Z"}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert!(goal.notification_enabled);
        assert!(goal.reminder_time.is_none());
        assert!(goal.activities.is_empty());
    }
}
