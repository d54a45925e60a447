//! Goal repository over the `goals` document.

use super::{Goal, GoalCategory, ReminderTime};
use crate::error::CoreError;
use crate::storage::{keys, Database};

pub struct GoalRepository<'a> {
    db: &'a Database,
    default_reminder: ReminderTime,
}

impl<'a> GoalRepository<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            db,
            default_reminder: ReminderTime::default(),
        }
    }

    /// Reminder time given to saved goals that have none.
    pub fn with_default_reminder(mut self, time: ReminderTime) -> Self {
        self.default_reminder = time;
        self
    }

    pub fn list(&self) -> Vec<Goal> {
        self.db.load_list(keys::GOALS)
    }

    pub fn get(&self, id: &str) -> Option<Goal> {
        self.list().into_iter().find(|g| g.id == id)
    }

    fn write(&self, goals: &[Goal]) -> Result<(), CoreError> {
        self.db.store_json(keys::GOALS, goals)
    }

    /// Insert or replace by id, filling in the default reminder time.
    pub fn save(&self, mut goal: Goal) -> Result<Goal, CoreError> {
        if goal.reminder_time.is_none() {
            goal.reminder_time = Some(self.default_reminder);
        }
        goal.completed = goal.progress >= 100;
        goal.progress = goal.progress.min(100);

        let mut goals = self.list();
        match goals.iter_mut().find(|g| g.id == goal.id) {
            Some(existing) => *existing = goal.clone(),
            None => goals.push(goal.clone()),
        }
        self.write(&goals)?;
        tracing::debug!(id = %goal.id, "saved goal");
        Ok(goal)
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut goals = self.list();
        goals.retain(|g| g.id != id);
        self.write(&goals)
    }

    /// Apply `change` to the goal with `id`, refresh `updatedAt` and write
    /// the list back. Unknown ids leave the store untouched.
    fn modify<F>(&self, id: &str, change: F) -> Result<Option<Goal>, CoreError>
    where
        F: FnOnce(&mut Goal),
    {
        let mut goals = self.list();
        let Some(goal) = goals.iter_mut().find(|g| g.id == id) else {
            tracing::debug!(id, "goal not found");
            return Ok(None);
        };
        change(goal);
        goal.touch();
        let updated = goal.clone();
        self.write(&goals)?;
        Ok(Some(updated))
    }

    /// Set progress, clamped to 0..=100.
    pub fn update_progress(&self, id: &str, progress: i32) -> Result<Option<Goal>, CoreError> {
        self.modify(id, |g| g.set_progress(progress))
    }

    pub fn toggle_completion(&self, id: &str) -> Result<Option<Goal>, CoreError> {
        self.modify(id, Goal::toggle_completion)
    }

    /// Move progress ten points up or down.
    pub fn step_progress(&self, id: &str, up: bool) -> Result<Option<Goal>, CoreError> {
        let delta = if up { 10 } else { -10 };
        self.modify(id, |g| g.set_progress(i32::from(g.progress) + delta))
    }

    pub fn set_notifications(&self, id: &str, enabled: bool) -> Result<Option<Goal>, CoreError> {
        self.modify(id, |g| g.notification_enabled = enabled)
    }

    pub fn set_reminder_time(
        &self,
        id: &str,
        time: ReminderTime,
    ) -> Result<Option<Goal>, CoreError> {
        self.modify(id, |g| g.reminder_time = Some(time))
    }

    pub fn by_category(&self, category: GoalCategory) -> Vec<Goal> {
        self.list()
            .into_iter()
            .filter(|g| g.category == category)
            .collect()
    }

    pub fn by_activity(&self, activity_id: &str) -> Vec<Goal> {
        self.list()
            .into_iter()
            .filter(|g| g.activities.iter().any(|a| a == activity_id))
            .collect()
    }

    pub fn completed(&self) -> Vec<Goal> {
        self.list().into_iter().filter(|g| g.completed).collect()
    }

    pub fn active(&self) -> Vec<Goal> {
        self.list().into_iter().filter(|g| !g.completed).collect()
    }
}
