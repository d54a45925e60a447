//! Reminder scheduling on top of a [`NotificationService`].

use chrono::{DateTime, Utc};

use super::{
    belongs_to_goal, plan_goal_reminder, plan_inactive_reminder, NotificationService,
    DEFAULT_INACTIVITY_DAYS,
};
use crate::error::NotificationError;
use crate::goals::Goal;

/// Schedules and cancels goal reminders.
///
/// Each call is a single attempt. Callers log failures; nothing here
/// retries.
pub struct ReminderScheduler<S> {
    service: S,
    inactivity_days: i64,
}

impl<S: NotificationService> ReminderScheduler<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            inactivity_days: DEFAULT_INACTIVITY_DAYS,
        }
    }

    pub fn with_inactivity_days(mut self, days: i64) -> Self {
        self.inactivity_days = days;
        self
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn into_inner(self) -> S {
        self.service
    }

    /// Replace the goal's reminders with a fresh daily reminder. Completed
    /// goals end up with none.
    pub fn schedule_goal_reminder(&mut self, goal: &Goal) -> Result<(), NotificationError> {
        self.cancel_goal_notifications(&goal.id)?;
        if let Some(request) = plan_goal_reminder(goal) {
            tracing::debug!(goal = %goal.id, identifier = %request.identifier, "scheduling daily reminder");
            self.service.schedule(request)?;
        }
        Ok(())
    }

    /// Schedule a resume nudge if the goal has been idle long enough.
    /// Returns whether one was scheduled.
    pub fn schedule_inactive_goal_reminder(
        &mut self,
        goal: &Goal,
        now: DateTime<Utc>,
    ) -> Result<bool, NotificationError> {
        match plan_inactive_reminder(goal, now, self.inactivity_days) {
            Some(request) => {
                tracing::debug!(goal = %goal.id, "scheduling inactivity reminder");
                self.service.schedule(request)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Cancel both reminder families for a goal. Returns how many requests
    /// were cancelled.
    pub fn cancel_goal_notifications(&mut self, goal_id: &str) -> Result<usize, NotificationError> {
        let matching: Vec<String> = self
            .service
            .scheduled_identifiers()?
            .into_iter()
            .filter(|id| belongs_to_goal(id, goal_id))
            .collect();
        for identifier in &matching {
            self.service.cancel(identifier)?;
        }
        Ok(matching.len())
    }

    /// Bring a goal's reminders in line with its notification flag.
    pub fn sync_goal(&mut self, goal: &Goal) -> Result<(), NotificationError> {
        if goal.notification_enabled {
            self.schedule_goal_reminder(goal)
        } else {
            self.cancel_goal_notifications(&goal.id).map(|_| ())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalCategory;
    use crate::notifications::{MemoryNotifications, NotificationRequest};
    use chrono::TimeZone;

    fn goal(id: &str) -> Goal {
        let mut g = Goal::new("Stretch", GoalCategory::PhysicalHealth);
        g.id = id.into();
        g.updated_at = "2024-01-01T00:00:00.000Z".into();
        g
    }

    fn ids(scheduler: &ReminderScheduler<MemoryNotifications>) -> Vec<String> {
        scheduler.service().scheduled_identifiers().unwrap()
    }

    #[test]
    fn schedule_replaces_existing_reminders() {
        let mut scheduler = ReminderScheduler::new(MemoryNotifications::new());
        let g = goal("g");
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();

        assert!(scheduler.schedule_inactive_goal_reminder(&g, now).unwrap());
        scheduler.schedule_goal_reminder(&g).unwrap();
        assert_eq!(ids(&scheduler), ["goal-reminder-g"]);
    }

    #[test]
    fn completed_goal_loses_reminders() {
        let mut scheduler = ReminderScheduler::new(MemoryNotifications::new());
        let mut g = goal("g");
        scheduler.schedule_goal_reminder(&g).unwrap();
        g.set_progress(100);
        scheduler.schedule_goal_reminder(&g).unwrap();
        assert!(ids(&scheduler).is_empty());
    }

    #[test]
    fn cancel_removes_both_families_only_for_that_goal() {
        let mut scheduler = ReminderScheduler::new(MemoryNotifications::new());
        let now = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        for id in ["a", "b"] {
            let g = goal(id);
            scheduler.schedule_goal_reminder(&g).unwrap();
            scheduler.schedule_inactive_goal_reminder(&g, now).unwrap();
        }

        assert_eq!(scheduler.cancel_goal_notifications("a").unwrap(), 2);
        assert_eq!(ids(&scheduler), ["goal-reminder-b", "goal-inactive-b"]);
    }

    #[test]
    fn inactivity_threshold_is_configurable() {
        let mut scheduler =
            ReminderScheduler::new(MemoryNotifications::new()).with_inactivity_days(7);
        let g = goal("g");
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap();
        assert!(!scheduler.schedule_inactive_goal_reminder(&g, now).unwrap());
    }

    #[test]
    fn sync_follows_notification_flag() {
        let mut scheduler = ReminderScheduler::new(MemoryNotifications::new());
        let mut g = goal("g");
        scheduler.sync_goal(&g).unwrap();
        assert_eq!(ids(&scheduler), ["goal-reminder-g"]);

        g.notification_enabled = false;
        scheduler.sync_goal(&g).unwrap();
        assert!(ids(&scheduler).is_empty());
    }

    struct Refusing;

    impl NotificationService for Refusing {
        fn scheduled_identifiers(&self) -> Result<Vec<String>, NotificationError> {
            Ok(Vec::new())
        }

        fn schedule(&mut self, request: NotificationRequest) -> Result<(), NotificationError> {
            Err(NotificationError::ScheduleFailed {
                identifier: request.identifier,
                message: "permission denied".into(),
            })
        }

        fn cancel(&mut self, _identifier: &str) -> Result<(), NotificationError> {
            Ok(())
        }
    }

    #[test]
    fn service_failures_surface_once() {
        let mut scheduler = ReminderScheduler::new(Refusing);
        let err = scheduler.schedule_goal_reminder(&goal("g")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to schedule 'goal-reminder-g': permission denied"
        );
    }
}
