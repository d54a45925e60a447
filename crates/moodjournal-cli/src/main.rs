use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod context;

#[derive(Parser)]
#[command(name = "moodjournal", version, about = "Personal mood journal")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Journal entries
    Entry {
        #[command(subcommand)]
        action: commands::entry::EntryAction,
    },
    /// Goals and progress
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Current positive-mood streak
    Streak {
        /// Print JSON
        #[arg(long)]
        json: bool,
    },
    /// Mood and activity insights
    Insights {
        #[command(subcommand)]
        action: commands::insights::InsightsAction,
    },
    /// App lock settings and unlock
    Security {
        #[command(subcommand)]
        action: commands::security::SecurityAction,
    },
    /// Scheduled goal reminders
    Reminders {
        #[command(subcommand)]
        action: commands::reminders::RemindersAction,
    },
    /// Built-in and custom activities
    Activity {
        #[command(subcommand)]
        action: commands::activity::ActivityAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// AI mood summaries
    Summary {
        #[command(subcommand)]
        action: commands::summary::SummaryAction,
    },
    /// Print shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Entry { action } => commands::entry::run(action),
        Commands::Goal { action } => commands::goal::run(action),
        Commands::Streak { json } => commands::streak::run(json),
        Commands::Insights { action } => commands::insights::run(action),
        Commands::Security { action } => commands::security::run(action),
        Commands::Reminders { action } => commands::reminders::run(action),
        Commands::Activity { action } => commands::activity::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Summary { action } => commands::summary::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "moodjournal", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
