use clap::Subcommand;
use moodjournal_core::summary::{api_key, build_summary_prompt, keyring_store};
use moodjournal_core::{SummaryClient, SummaryProvider};

use crate::context::{AppContext, CliResult};

#[derive(Subcommand)]
pub enum SummaryAction {
    /// Summarize recent entries with the configured provider
    Generate {
        /// openai or huggingface; defaults to summary.provider
        #[arg(long)]
        provider: Option<SummaryProvider>,
        /// How many recent entries to send; defaults to summary.prompt_entries
        #[arg(long)]
        entries: Option<usize>,
        /// Print the prompt instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Store a provider API key in the system keyring
    SetKey {
        provider: SummaryProvider,
        key: String,
    },
    /// Remove a stored API key
    ClearKey { provider: SummaryProvider },
}

pub fn run(action: SummaryAction) -> CliResult {
    match action {
        SummaryAction::Generate {
            provider,
            entries,
            dry_run,
        } => {
            let ctx = AppContext::open_unlocked()?;
            let repo = ctx.entries()?;
            let list = repo.list();
            if list.is_empty() {
                return Err("no entries to summarize".into());
            }

            let config = &ctx.config.summary;
            let limit = entries.unwrap_or(config.prompt_entries);
            let prompt = build_summary_prompt(&list, &repo.list_custom_activities(), limit);
            if dry_run {
                println!("{prompt}");
                return Ok(());
            }

            let provider = match provider {
                Some(p) => p,
                None => config.provider.parse()?,
            };
            let client = SummaryClient::new(provider, api_key(provider)?, config);
            tracing::info!(provider = %client.provider(), "requesting summary");
            let runtime = tokio::runtime::Runtime::new()?;
            let summary = runtime.block_on(client.summarize(&prompt))?;
            println!("{summary}");
        }
        SummaryAction::SetKey { provider, key } => {
            keyring_store::set(provider.keyring_key(), key.trim())?;
            println!("{provider} key stored");
        }
        SummaryAction::ClearKey { provider } => {
            keyring_store::delete(provider.keyring_key())?;
            println!("{provider} key removed");
        }
    }
    Ok(())
}
