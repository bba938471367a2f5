//! FreightDesk CLI — the main entry point.
//!
//! Commands:
//! - `chat`       — Ask the logistics assistant, optionally with a dataset attached
//! - `summarize`  — Print the digest of a tabular file without calling the model
//! - `history`    — List, show, clear, or delete saved conversations

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "freightdesk",
    about = "FreightDesk — AI-assisted logistics data analysis",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the logistics assistant
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// Attach a tabular data file (csv, xlsx, xls) as analysis context
        #[arg(short, long)]
        data: Option<PathBuf>,

        /// Resume a saved conversation by id
        #[arg(short, long)]
        conversation: Option<String>,
    },

    /// Summarize a tabular file and print the digest
    Summarize {
        /// The file to summarize
        file: PathBuf,

        /// Seed for the text-column sample (reproducible output)
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// Manage saved conversations
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat {
            message,
            data,
            conversation,
        } => commands::chat::run(message, data, conversation).await?,
        Commands::Summarize { file, seed } => commands::summarize::run(&file, seed)?,
        Commands::History { action } => commands::history::run(action).await?,
    }

    Ok(())
}
