//! Goal reminders.
//!
//! Planning is a pure function of goal state and the current time. Actual
//! delivery goes through a [`NotificationService`], which stands in for the
//! platform notification centre.

mod queue;
mod scheduler;

pub use queue::{KvNotificationQueue, MemoryNotifications};
pub use scheduler::ReminderScheduler;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::NotificationError;
use crate::goals::Goal;
use crate::timestamp::{self, MS_PER_DAY};

pub const REMINDER_PREFIX: &str = "goal-reminder-";
pub const INACTIVE_PREFIX: &str = "goal-inactive-";

/// Days without progress before a resume reminder is due.
pub const DEFAULT_INACTIVITY_DAYS: i64 = 3;

/// When a notification fires.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Trigger {
    /// Repeats every day at the given local time.
    Daily { hour: u8, minute: u8 },
    /// Fires once after a delay.
    After { seconds: u64 },
}

/// A request handed to the notification service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationRequest {
    pub identifier: String,
    pub title: String,
    pub body: String,
    pub trigger: Trigger,
    pub payload: serde_json::Value,
}

/// Platform notification centre.
///
/// Scheduling a request whose identifier is already scheduled replaces it.
pub trait NotificationService {
    /// Identifiers of every pending request.
    fn scheduled_identifiers(&self) -> Result<Vec<String>, NotificationError>;

    fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotificationError>;

    /// Cancel by identifier. Unknown identifiers are ignored.
    fn cancel(&mut self, identifier: &str) -> Result<(), NotificationError>;
}

pub fn reminder_identifier(goal_id: &str) -> String {
    format!("{REMINDER_PREFIX}{goal_id}")
}

pub fn inactive_identifier(goal_id: &str) -> String {
    format!("{INACTIVE_PREFIX}{goal_id}")
}

fn goal_payload(goal: &Goal) -> serde_json::Value {
    serde_json::json!({ "goalId": goal.id })
}

/// Daily reminder for an unfinished goal at its reminder time.
pub fn plan_goal_reminder(goal: &Goal) -> Option<NotificationRequest> {
    if goal.completed {
        return None;
    }
    let time = goal.reminder_time.unwrap_or_default();
    Some(NotificationRequest {
        identifier: reminder_identifier(&goal.id),
        title: "Goal Reminder".into(),
        body: format!("Don't forget to work on your goal: {}", goal.title),
        trigger: Trigger::Daily {
            hour: time.hour,
            minute: time.minute,
        },
        payload: goal_payload(goal),
    })
}

/// Whole days since the goal was last updated, rounded down. `None` when
/// `updatedAt` cannot be parsed.
pub fn days_since_update(goal: &Goal, now: DateTime<Utc>) -> Option<i64> {
    let updated = timestamp::parse_iso(&goal.updated_at)?;
    Some((now - updated).num_milliseconds().div_euclid(MS_PER_DAY))
}

/// One-shot nudge for an unfinished goal idle for at least
/// `threshold_days` whole days.
pub fn plan_inactive_reminder(
    goal: &Goal,
    now: DateTime<Utc>,
    threshold_days: i64,
) -> Option<NotificationRequest> {
    if goal.completed {
        return None;
    }
    let days = days_since_update(goal, now)?;
    if days < threshold_days {
        return None;
    }
    Some(NotificationRequest {
        identifier: inactive_identifier(&goal.id),
        title: "Resume Your Goal".into(),
        body: format!(
            "You haven't made progress on \"{}\" in {days} days. Keep going!",
            goal.title
        ),
        trigger: Trigger::After { seconds: 1 },
        payload: goal_payload(goal),
    })
}

/// Whether `identifier` belongs to `goal_id`.
///
/// Matching is by prefix, so goal `1` also claims `goal-reminder-12`.
/// Ids are UUIDs in practice.
pub fn belongs_to_goal(identifier: &str, goal_id: &str) -> bool {
    identifier.starts_with(&reminder_identifier(goal_id))
        || identifier.starts_with(&inactive_identifier(goal_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::{GoalCategory, ReminderTime};
    use chrono::TimeZone;

    fn goal_updated(updated_at: &str) -> Goal {
        let mut g = Goal::new("Read more", GoalCategory::PersonalGrowth);
        g.id = "g1".into();
        g.updated_at = updated_at.into();
        g
    }

    #[test]
    fn daily_plan_uses_reminder_time() {
        let mut goal = goal_updated("2024-01-01T00:00:00.000Z");
        let plan = plan_goal_reminder(&goal).unwrap();
        assert_eq!(plan.identifier, "goal-reminder-g1");
        assert_eq!(plan.title, "Goal Reminder");
        assert_eq!(plan.body, "Don't forget to work on your goal: Read more");
        assert_eq!(plan.trigger, Trigger::Daily { hour: 10, minute: 0 });
        assert_eq!(plan.payload["goalId"], "g1");

        goal.reminder_time = Some(ReminderTime::new(21, 45).unwrap());
        let plan = plan_goal_reminder(&goal).unwrap();
        assert_eq!(plan.trigger, Trigger::Daily { hour: 21, minute: 45 });
    }

    #[test]
    fn completed_goals_get_no_plans() {
        let mut goal = goal_updated("2024-01-01T00:00:00.000Z");
        goal.set_progress(100);
        let now = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        assert!(plan_goal_reminder(&goal).is_none());
        assert!(plan_inactive_reminder(&goal, now, DEFAULT_INACTIVITY_DAYS).is_none());
    }

    #[test]
    fn inactive_plan_starts_at_three_whole_days() {
        let goal = goal_updated("2024-01-01T12:00:00.000Z");
        let two_and_a_bit = Utc.with_ymd_and_hms(2024, 1, 4, 11, 59, 59).unwrap();
        assert!(plan_inactive_reminder(&goal, two_and_a_bit, 3).is_none());

        let three = Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0).unwrap();
        let plan = plan_inactive_reminder(&goal, three, 3).unwrap();
        assert_eq!(plan.identifier, "goal-inactive-g1");
        assert_eq!(plan.title, "Resume Your Goal");
        assert_eq!(
            plan.body,
            "You haven't made progress on \"Read more\" in 3 days. Keep going!"
        );
        assert_eq!(plan.trigger, Trigger::After { seconds: 1 });
    }

    #[test]
    fn unparseable_update_time_plans_nothing() {
        let goal = goal_updated("someday");
        let now = Utc.with_ymd_and_hms(2024, 1, 4, 12, 0, 0).unwrap();
        assert!(plan_inactive_reminder(&goal, now, 3).is_none());
    }

    #[test]
    fn prefix_matching_over_matches() {
        assert!(belongs_to_goal("goal-reminder-1", "1"));
        assert!(belongs_to_goal("goal-inactive-1", "1"));
        assert!(belongs_to_goal("goal-reminder-12", "1"));
        assert!(!belongs_to_goal("goal-reminder-2", "1"));
    }
}
