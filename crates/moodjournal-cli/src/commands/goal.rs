//! Goal commands for CLI.

use std::collections::HashSet;

use clap::{Subcommand, ValueEnum};
use moodjournal_core::{Goal, GoalCategory, ReminderTime};

use crate::context::{print_json, split_list, AppContext, CliResult};

#[derive(Clone, Copy, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

#[derive(Subcommand)]
pub enum GoalAction {
    /// Create a goal
    Add {
        title: String,
        /// Mental Health, Physical Health, Social, Personal Growth or Work
        #[arg(long, default_value = "Personal Growth")]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Comma-separated activity ids linked to this goal
        #[arg(long)]
        activities: Option<String>,
        /// Daily reminder time (HH:MM); defaults to the configured time
        #[arg(long)]
        reminder: Option<String>,
        /// Create without reminders
        #[arg(long)]
        no_notify: bool,
    },
    /// List goals
    List {
        #[arg(long)]
        category: Option<String>,
        /// Only goals linked to this activity id
        #[arg(long)]
        activity: Option<String>,
        /// Only completed goals
        #[arg(long, conflicts_with = "active")]
        completed: bool,
        /// Only goals still in progress
        #[arg(long)]
        active: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show one goal as JSON
    Show { id: String },
    /// Set progress (0-100; out-of-range values are clamped)
    Progress {
        id: String,
        #[arg(allow_hyphen_values = true)]
        value: i32,
    },
    /// Move progress ten points up, or down with --down
    Step {
        id: String,
        #[arg(long)]
        down: bool,
    },
    /// Flip completion
    Toggle { id: String },
    /// Turn reminders on or off
    Notify { id: String, state: Toggle },
    /// Change the daily reminder time
    Reminder {
        id: String,
        /// HH:MM
        time: String,
    },
    /// Delete a goal and cancel its reminders
    Delete { id: String },
}

/// Narrow `goals` to those whose id also appears in `matches`.
fn keep_ids(goals: &mut Vec<Goal>, matches: Vec<Goal>) {
    let ids: HashSet<String> = matches.into_iter().map(|g| g.id).collect();
    goals.retain(|g| ids.contains(&g.id));
}

fn print_goal_line(goal: &Goal) {
    let mark = if goal.completed { "x" } else { " " };
    let bell = match (goal.notification_enabled, goal.reminder_time) {
        (true, Some(t)) => format!("  @{t}"),
        _ => String::new(),
    };
    println!(
        "[{mark}] {}  {:>3}%  {}  ({}){bell}",
        goal.id, goal.progress, goal.title, goal.category
    );
}

/// Re-plan reminders after a mutation. Failures are logged, never fatal.
fn sync_reminders(ctx: &AppContext, goal: &Goal) {
    if let Err(e) = ctx.scheduler().sync_goal(goal) {
        tracing::warn!(goal = %goal.id, error = %e, "failed to sync goal reminders");
    }
}

fn not_found(id: &str) -> Box<dyn std::error::Error> {
    format!("goal not found: {id}").into()
}

pub fn run(action: GoalAction) -> CliResult {
    let ctx = AppContext::open_unlocked()?;
    let repo = ctx.goals();

    match action {
        GoalAction::Add {
            title,
            category,
            description,
            activities,
            reminder,
            no_notify,
        } => {
            let mut goal = Goal::new(title, category.parse::<GoalCategory>()?);
            goal.description = description;
            goal.activities = activities.as_deref().map(split_list).unwrap_or_default();
            goal.reminder_time = reminder.as_deref().map(str::parse::<ReminderTime>).transpose()?;
            goal.notification_enabled = !no_notify;

            let goal = repo.save(goal)?;
            sync_reminders(&ctx, &goal);
            println!("Goal created: {}", goal.id);
        }
        GoalAction::List {
            category,
            activity,
            completed,
            active,
            json,
        } => {
            let mut goals = if completed {
                repo.completed()
            } else if active {
                repo.active()
            } else {
                repo.list()
            };
            if let Some(c) = &category {
                keep_ids(&mut goals, repo.by_category(c.parse()?));
            }
            if let Some(activity) = &activity {
                keep_ids(&mut goals, repo.by_activity(activity));
            }

            if json {
                print_json(&goals)?;
            } else if goals.is_empty() {
                println!("No goals.");
            } else {
                goals.iter().for_each(print_goal_line);
            }
        }
        GoalAction::Show { id } => {
            let goal = repo.get(&id).ok_or_else(|| not_found(&id))?;
            print_json(&goal)?;
        }
        GoalAction::Progress { id, value } => {
            let goal = repo.update_progress(&id, value)?.ok_or_else(|| not_found(&id))?;
            sync_reminders(&ctx, &goal);
            print_goal_line(&goal);
        }
        GoalAction::Step { id, down } => {
            let goal = repo.step_progress(&id, !down)?.ok_or_else(|| not_found(&id))?;
            sync_reminders(&ctx, &goal);
            print_goal_line(&goal);
        }
        GoalAction::Toggle { id } => {
            let goal = repo.toggle_completion(&id)?.ok_or_else(|| not_found(&id))?;
            sync_reminders(&ctx, &goal);
            print_goal_line(&goal);
        }
        GoalAction::Notify { id, state } => {
            let enabled = matches!(state, Toggle::On);
            let goal = repo
                .set_notifications(&id, enabled)?
                .ok_or_else(|| not_found(&id))?;
            sync_reminders(&ctx, &goal);
            println!(
                "Reminders {} for {}",
                if enabled { "enabled" } else { "disabled" },
                goal.title
            );
        }
        GoalAction::Reminder { id, time } => {
            let time: ReminderTime = time.parse()?;
            let goal = repo
                .set_reminder_time(&id, time)?
                .ok_or_else(|| not_found(&id))?;
            sync_reminders(&ctx, &goal);
            println!("Reminder for {} set to {time}", goal.title);
        }
        GoalAction::Delete { id } => {
            if repo.get(&id).is_none() {
                return Err(not_found(&id));
            }
            repo.delete(&id)?;
            if let Err(e) = ctx.scheduler().cancel_goal_notifications(&id) {
                tracing::warn!(goal = %id, error = %e, "failed to cancel goal reminders");
            }
            println!("Goal deleted: {id}");
        }
    }
    Ok(())
}
