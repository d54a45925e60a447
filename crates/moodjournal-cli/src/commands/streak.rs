use moodjournal_core::compute_streak;
use moodjournal_core::timestamp;

use crate::context::{print_json, AppContext, CliResult};

pub fn run(json: bool) -> CliResult {
    let ctx = AppContext::open_unlocked()?;
    let streak = compute_streak(&ctx.entries()?.list());

    if json {
        return print_json(&streak);
    }
    match streak.count {
        0 => println!("No streak yet. Log a positive mood today to start one."),
        1 => println!("1 day streak"),
        n => println!("{n} day streak"),
    }
    if let (Some(last), Some(first)) = (streak.dates.first(), streak.dates.last()) {
        println!(
            "  {} .. {}",
            timestamp::day_prefix(first),
            timestamp::day_prefix(last)
        );
    }
    Ok(())
}
