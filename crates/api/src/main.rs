//! draftpilot command-line entry point

mod assistant;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use draftpilot_infra::config::AppConfig;
use draftpilot_infra::{CredentialStore, GraphGateway, HttpClient, OllamaClient};

use crate::assistant::Assistant;

#[derive(Parser)]
#[command(name = "draftpilot", about = "Mailbox reply drafting with calendar-aware availability")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Draft replies for unread inbox messages
    Process {
        /// Maximum number of messages to process
        #[arg(long, default_value_t = 10)]
        limit: u32,

        /// Generate and sanitize but do not persist drafts or mark anything
        /// read
        #[arg(long)]
        dry_run: bool,
    },

    /// Show open calendar slots over the coming days
    Slots {
        /// Horizon in days, starting today
        #[arg(long)]
        days: Option<u32>,
    },

    /// List unread inbox messages
    Unread {
        /// Maximum number of messages to list
        #[arg(long, default_value_t = 25)]
        top: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Optional; real deployments set the environment directly.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let config = draftpilot_infra::config::load().context("loading configuration")?;
    let assistant = build_assistant(&config, &cli.command).context("wiring services")?;

    match cli.command {
        Command::Process { limit, dry_run } => {
            let outcome = assistant.process_unread(limit, dry_run).await?;
            info!(drafted = outcome.drafted, failed = outcome.failed, "batch finished");
            println!("drafted {} message(s), {} failed", outcome.drafted, outcome.failed);
        }
        Command::Slots { .. } => {
            let slots = assistant.available_slots().await?;
            if slots.is_empty() {
                println!("no open slots");
            }
            let tz = config.scheduling.working_window.timezone();
            for slot in &slots {
                let start = slot.start.with_timezone(&tz);
                let end = slot.end.with_timezone(&tz);
                println!(
                    "{} {} - {} ({} min)",
                    start.format("%Y-%m-%d"),
                    start.format("%H:%M"),
                    end.format("%H:%M"),
                    slot.duration_minutes,
                );
            }
        }
        Command::Unread { top } => {
            for message in assistant.unread(top).await? {
                let from = message.from_name.as_deref().unwrap_or(&message.from_address);
                println!("{}  {}  {}", message.received_at.format("%Y-%m-%d %H:%M"), from, message.subject);
            }
        }
    }

    Ok(())
}

fn build_assistant(config: &AppConfig, command: &Command) -> anyhow::Result<Assistant> {
    // Provider and token calls run on a single attempt: the only automatic
    // retry in the system is the gateway's 401 renewal replay.
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(30))
        .max_attempts(1)
        .user_agent("draftpilot/0.1")
        .build()?;

    let credentials =
        Arc::new(CredentialStore::client_credentials(&config.graph, http.clone()));
    let gateway = Arc::new(GraphGateway::new(http, credentials, config.graph.mailbox.clone()));
    let generator = Arc::new(OllamaClient::new(&config.ollama)?);

    let mut scheduling = config.scheduling.clone();
    if let Command::Slots { days: Some(days) } = command {
        scheduling.days_ahead = *days;
    }

    Ok(Assistant::new(gateway, generator, scheduling))
}
