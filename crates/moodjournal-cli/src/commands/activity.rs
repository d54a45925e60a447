use clap::Subcommand;
use moodjournal_core::catalog::{Activity, ACTIVITIES};
use moodjournal_core::CustomActivity;

use crate::context::{print_json, AppContext, CliResult};

#[derive(Subcommand)]
pub enum ActivityAction {
    /// List built-in and custom activities
    List {
        #[arg(long)]
        json: bool,
    },
    /// Add a custom activity
    Add {
        name: String,
        #[arg(long, default_value = "ellipse")]
        icon: String,
        #[arg(long, default_value = "Custom")]
        category: String,
    },
    /// Remove a custom activity
    Remove { id: String },
}

/// Id for a new custom activity: `custom-` plus the slugged name.
fn custom_id(name: &str) -> String {
    let slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();
    format!("custom-{}", slug.trim_matches('-'))
}

pub fn run(action: ActivityAction) -> CliResult {
    let ctx = AppContext::open_unlocked()?;
    let repo = ctx.entries()?;

    match action {
        ActivityAction::List { json } => {
            let custom = repo.list_custom_activities();
            if json {
                let builtin: Vec<CustomActivity> = ACTIVITIES
                    .iter()
                    .map(|a| CustomActivity {
                        id: a.id.to_string(),
                        name: a.name.to_string(),
                        icon: a.icon.to_string(),
                        category: a.category.as_str().to_string(),
                    })
                    .chain(custom)
                    .collect();
                return print_json(&builtin);
            }
            for a in ACTIVITIES {
                println!("{:<12} {:<12} {}", a.id, a.name, a.category.as_str());
            }
            for c in &custom {
                println!("{:<12} {:<12} {} (custom)", c.id, c.name, c.category);
            }
        }
        ActivityAction::Add {
            name,
            icon,
            category,
        } => {
            let id = custom_id(&name);
            if Activity::from_id(&id).is_some()
                || repo.list_custom_activities().iter().any(|c| c.id == id)
            {
                return Err(format!("activity already exists: {id}").into());
            }
            repo.save_custom_activity(CustomActivity {
                id: id.clone(),
                name,
                icon,
                category,
            })?;
            println!("Activity added: {id}");
        }
        ActivityAction::Remove { id } => {
            if !repo.list_custom_activities().iter().any(|c| c.id == id) {
                return Err(format!("custom activity not found: {id}").into());
            }
            repo.delete_custom_activity(&id)?;
            println!("Activity removed: {id}");
        }
    }
    Ok(())
}
