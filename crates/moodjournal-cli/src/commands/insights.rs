use chrono::{Datelike, Utc};
use clap::Subcommand;
use moodjournal_core::catalog::activity_name;
use moodjournal_core::insights;

use crate::context::{print_json, AppContext, CliResult};

#[derive(Subcommand)]
pub enum InsightsAction {
    /// How often each mood was logged
    Moods {
        #[arg(long)]
        json: bool,
    },
    /// Most frequent activities
    Activities {
        /// How many to show; defaults to insights.top_activities
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Month grid of logged moods
    Calendar {
        /// YYYY-MM; defaults to the current month
        #[arg(long)]
        month: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Average primary-mood intensity
    Intensity,
}

fn parse_month(raw: &str) -> CliResult<(i32, u32)> {
    let (y, m) = raw
        .split_once('-')
        .ok_or_else(|| format!("expected YYYY-MM, got '{raw}'"))?;
    Ok((y.parse()?, m.parse()?))
}

pub fn run(action: InsightsAction) -> CliResult {
    let ctx = AppContext::open_unlocked()?;
    let repo = ctx.entries()?;
    let entries = repo.list();

    match action {
        InsightsAction::Moods { json } => {
            let shares = insights::mood_distribution(&entries);
            if json {
                return print_json(&shares);
            }
            for share in &shares {
                println!("{:<12} {:>4}  {:>5.1}%", share.mood, share.count, share.percentage);
            }
        }
        InsightsAction::Activities { limit, json } => {
            let limit = limit.unwrap_or(ctx.config.insights.top_activities);
            let top = insights::top_activities(&entries, limit);
            if json {
                return print_json(&top);
            }
            let custom = repo.list_custom_activities();
            for item in &top {
                println!("{:<16} {:>4}", activity_name(&item.activity, &custom), item.count);
            }
        }
        InsightsAction::Calendar { month, json } => {
            let (year, month) = match month {
                Some(raw) => parse_month(&raw)?,
                None => {
                    let today = Utc::now();
                    (today.year(), today.month())
                }
            };
            let calendar = insights::mood_calendar(&entries, year, month)?;
            if json {
                return print_json(&calendar);
            }

            println!("{year:04}-{month:02}");
            println!(" Su  Mo  Tu  We  Th  Fr  Sa");
            let mut cells: Vec<String> = vec!["    ".to_string(); calendar.leading_blanks as usize];
            cells.extend(calendar.days.iter().map(|d| {
                let mark = if d.mood.is_some() { '*' } else { ' ' };
                format!("{:>3}{mark}", d.day)
            }));
            for week in cells.chunks(7) {
                println!("{}", week.concat());
            }
            for day in calendar.days.iter().filter(|d| d.mood.is_some()) {
                println!("  {}  {}", day.date, day.mood.as_deref().unwrap_or_default());
            }
        }
        InsightsAction::Intensity => match insights::average_intensity(&entries) {
            Some(avg) => println!("Average intensity: {avg:.2}"),
            None => println!("No entries."),
        },
    }
    Ok(())
}
