//! Smish Sentinel - SMS fraud risk scanner
//!
//! Scores received text messages for smishing risk, locally or through a
//! hosted LLM, and keeps a per-user history of assessments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use smish_sentinel::config::AppConfig;
use smish_sentinel::Language;

mod cli;

/// Smish Sentinel - SMS fraud risk scanner
#[derive(Parser)]
#[command(name = "smish-sentinel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (defaults to config/sentinel.yaml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a message for fraud risk
    Scan {
        /// Message text
        message: String,

        /// Sender phone number or label
        #[arg(short, long)]
        sender: String,

        /// The sender is in your contacts
        #[arg(long)]
        in_contacts: bool,

        /// Use the remote AI classifier instead of the local heuristic
        #[arg(long)]
        ai: bool,

        /// Response language for the AI classifier (english, hindi, telugu)
        #[arg(short, long, default_value = "english")]
        language: Language,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,

        /// Save the assessment to history
        #[arg(long)]
        save: bool,

        /// User to save the assessment under
        #[arg(short, long, default_value = "local")]
        user: String,
    },

    /// Normalize raw classifier output into an assessment
    Normalize {
        /// File holding the classifier output (reads stdin when omitted)
        file: Option<PathBuf>,

        /// Sender phone used when the output names none
        #[arg(short, long)]
        sender: String,
    },

    /// Ask the assistant a follow-up question
    Chat {
        /// Your question
        question: String,

        /// Message the question is about
        #[arg(short, long)]
        message: Option<String>,

        /// Sender of that message
        #[arg(short, long)]
        sender: Option<String>,

        /// Reply language (english, hindi, telugu)
        #[arg(short, long, default_value = "english")]
        language: Language,
    },

    /// Show saved assessments
    History {
        #[arg(short, long, default_value = "local")]
        user: String,

        /// Number of recent entries to show
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,
    },

    /// Show saved assessment counts by risk level
    Stats {
        #[arg(short, long, default_value = "local")]
        user: String,
    },

    /// Delete saved assessments older than a number of days
    Purge {
        /// Age in days (defaults to storage.retention_days)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Run the HTTP API
    Serve {
        /// Address to listen on (defaults to server.listen)
        #[arg(short, long)]
        listen: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG takes precedence over -v
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let level = match cli.verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        };
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(false)
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Scan {
            message,
            sender,
            in_contacts,
            ai,
            language,
            json,
            save,
            user,
        } => {
            let opts = cli::scan::ScanOptions {
                in_contacts,
                ai,
                language,
                json,
                save_as: save.then_some(user),
            };
            cli::scan::run(&config, &message, &sender, opts).await?;
        }
        Commands::Normalize { file, sender } => {
            cli::normalize::run(&config, file.as_deref(), &sender)?;
        }
        Commands::Chat {
            question,
            message,
            sender,
            language,
        } => {
            cli::chat::run(&config, &question, message.as_deref(), sender.as_deref(), language)
                .await?;
        }
        Commands::History { user, limit } => {
            cli::history::list(&config, &user, limit)?;
        }
        Commands::Stats { user } => {
            cli::history::stats(&config, &user)?;
        }
        Commands::Purge { days } => {
            cli::history::purge(&config, days)?;
        }
        Commands::Serve { listen } => {
            info!("🛡️ Starting Smish Sentinel API...");
            cli::serve::run(&config, listen).await?;
        }
    }

    Ok(())
}
