use chrono::Utc;
use clap::Subcommand;
use moodjournal_core::notifications::Trigger;

use crate::context::{print_json, AppContext, CliResult};

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Show pending reminders
    List {
        #[arg(long)]
        json: bool,
    },
    /// Re-plan daily reminders for every goal and queue nudges for idle ones
    Sync,
    /// Cancel every reminder for a goal
    Cancel { goal_id: String },
}

pub fn run(action: RemindersAction) -> CliResult {
    let ctx = AppContext::open_unlocked()?;

    match action {
        RemindersAction::List { json } => {
            let pending = moodjournal_core::KvNotificationQueue::new(&ctx.db).pending();
            if json {
                return print_json(&pending);
            }
            if pending.is_empty() {
                println!("No reminders scheduled.");
            }
            for request in &pending {
                let when = match request.trigger {
                    Trigger::Daily { hour, minute } => format!("daily {hour:02}:{minute:02}"),
                    Trigger::After { seconds } => format!("in {seconds}s"),
                };
                println!("{:<50} {when:<12} {}", request.identifier, request.body);
            }
        }
        RemindersAction::Sync => {
            let goals = ctx.goals().list();
            let mut scheduler = ctx.scheduler();
            let now = Utc::now();
            let (mut synced, mut nudged, mut failed) = (0usize, 0usize, 0usize);

            for goal in &goals {
                let result = scheduler.sync_goal(goal).and_then(|()| {
                    if goal.notification_enabled {
                        scheduler.schedule_inactive_goal_reminder(goal, now)
                    } else {
                        Ok(false)
                    }
                });
                match result {
                    Ok(nudge) => {
                        synced += 1;
                        nudged += usize::from(nudge);
                    }
                    Err(e) => {
                        failed += 1;
                        tracing::warn!(goal = %goal.id, error = %e, "failed to sync reminders");
                    }
                }
            }
            println!("Synced {synced} goal(s), {nudged} inactivity reminder(s)");
            if failed > 0 {
                return Err(format!("{failed} goal(s) could not be synced").into());
            }
        }
        RemindersAction::Cancel { goal_id } => {
            let cancelled = ctx.scheduler().cancel_goal_notifications(&goal_id)?;
            println!("Cancelled {cancelled} reminder(s)");
        }
    }
    Ok(())
}
