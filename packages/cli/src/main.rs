//! Matchday command-line interface.
//!
//! Thin orchestration over the `matchday` library: parse a chat export,
//! sync it into the event store, and query the result. All paths and the
//! model command come from flags or the environment (`.env` is honored).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cmd;
mod config;
mod model;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "matchday", about = "Extract football events from chat exports", version)]
struct Cli {
    /// Data directory holding the event store and sync state
    #[arg(long, global = true, env = "MATCHDAY_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Shell command used as the AI model collaborator (prompt on stdin)
    #[arg(long, global = true, env = "MATCHDAY_MODEL_CMD")]
    model_cmd: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a chat export and reconcile every message into the store
    Import {
        /// WhatsApp chat-export text file
        export: PathBuf,

        /// Skip the model collaborator, pattern extraction only
        #[arg(long)]
        no_model: bool,

        /// Run the pipeline but do not save
        #[arg(long)]
        dry_run: bool,
    },

    /// Incremental pass: only messages newer than the last sync
    Sync {
        /// WhatsApp chat-export text file
        export: PathBuf,

        /// Clear the store and rebuild from the full history
        #[arg(long)]
        full: bool,

        /// Only consider the newest N messages from the export
        #[arg(long)]
        limit: Option<usize>,

        /// Skip the model collaborator, pattern extraction only
        #[arg(long)]
        no_model: bool,

        /// Run the pipeline but do not save
        #[arg(long)]
        dry_run: bool,
    },

    /// List complete events from the store
    List {
        /// Only events on or after this date (YYYY-MM-DD, default today)
        #[arg(long)]
        from: Option<chrono::NaiveDate>,

        /// Only events on or before this date
        #[arg(long)]
        to: Option<chrono::NaiveDate>,

        /// Filter by type: tournament, friendly_match, training
        #[arg(long = "type")]
        event_type: Option<String>,

        /// Minimum skill level (1-10)
        #[arg(long)]
        min_level: Option<u8>,

        /// Maximum skill level (1-10)
        #[arg(long)]
        max_level: Option<u8>,

        /// Hide events marked as full
        #[arg(long)]
        open_only: bool,

        /// Location substring filter
        #[arg(long)]
        location: Option<String>,

        /// Organizer substring filter
        #[arg(long)]
        organizer: Option<String>,

        /// Emit JSON instead of the table
        #[arg(long)]
        json: bool,
    },

    /// Print the notification body for upcoming events
    Notify {
        /// Only events within the next N days
        #[arg(long, default_value_t = 14)]
        days: u32,
    },

    /// Show store and sync-state statistics
    Status,

    /// Run extraction on an export and print candidates without touching the store
    Analyze {
        /// WhatsApp chat-export text file
        export: PathBuf,

        /// Skip the model collaborator, pattern extraction only
        #[arg(long)]
        no_model: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,matchday=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::new(cli.data_dir, cli.model_cmd);

    match cli.command {
        Commands::Import {
            export,
            no_model,
            dry_run,
        } => cmd::sync::run(&config, &export, false, no_model, dry_run, false, None).await,
        Commands::Sync {
            export,
            full,
            limit,
            no_model,
            dry_run,
        } => cmd::sync::run(&config, &export, true, no_model, dry_run, full, limit).await,
        Commands::List {
            from,
            to,
            event_type,
            min_level,
            max_level,
            open_only,
            location,
            organizer,
            json,
        } => cmd::list::run(
            &config,
            cmd::list::ListArgs {
                from,
                to,
                event_type,
                min_level,
                max_level,
                open_only,
                location,
                organizer,
                json,
            },
        ),
        Commands::Notify { days } => cmd::notify::run(&config, days).await,
        Commands::Status => cmd::status::run(&config),
        Commands::Analyze { export, no_model } => {
            cmd::analyze::run(&config, &export, no_model).await
        }
    }
}
