//! Homework Status Bot - Main Entry Point
//!
//! Polls the Practicum homework API and sends review status changes
//! to a Telegram chat.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use homework_status_bot::BotError;
use homework_status_bot::config::{BotSettings, Credentials, VerdictTable};
use homework_status_bot::poller::HomeworkPoller;
use homework_status_bot::telegram::TelegramBot;

/// Telegram bot for homework review status updates.
#[derive(Parser, Debug)]
#[command(name = "homework_bot")]
#[command(about = "Notify a Telegram chat about homework review status changes")]
#[command(version)]
struct Args {
    /// Path to the .env file for environment variables.
    #[arg(long, default_value = ".env")]
    env_file: String,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Path to a verdict table JSON file (overrides `VERDICTS_PATH`).
    #[arg(long)]
    verdicts: Option<String>,

    /// Generate an example verdict table file and exit.
    #[arg(long)]
    generate_verdicts: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args.log_level);

    if args.generate_verdicts {
        return generate_example_verdicts();
    }

    // Load environment variables
    if let Err(e) = dotenvy::from_filename(&args.env_file) {
        debug!("Could not load .env file ({}): {}", args.env_file, e);
    }

    let credentials = Credentials::from_env();
    if !credentials.check_tokens() {
        return Err(BotError::Configuration(credentials.missing()))
            .context("Bot cannot start without its tokens");
    }

    let mut settings = BotSettings::from_env_with_defaults();
    if let Some(path) = args.verdicts {
        settings.verdicts_path = Some(path.into());
    }

    let verdicts = match &settings.verdicts_path {
        Some(path) => VerdictTable::load_from_file(path)
            .with_context(|| format!("Failed to load verdict table from {}", path.display()))?,
        None => VerdictTable::default(),
    };
    verdicts
        .validate()
        .context("Verdict table validation failed")?;

    info!("Loaded {} verdicts", verdicts.len());

    let mut poller = HomeworkPoller::<TelegramBot>::from_config(&credentials, &settings, verdicts)
        .context("Failed to set up the homework poller")?;

    info!("Bot is running. Use Ctrl+C to stop.");

    poller
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
            info!("Received Ctrl+C, shutting down...");
        })
        .await;

    info!("Bot stopped");
    Ok(())
}

/// Initializes the logging subsystem.
fn init_logging(level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Generates an example verdict table file.
fn generate_example_verdicts() -> Result<()> {
    VerdictTable::default().save_to_file("verdicts.example.json")?;

    println!("✓ Example verdict table written to: verdicts.example.json");
    println!("\nTo use this bot:");
    println!("1. Create a .env file with PRACTICUM_TOKEN, TELEGRAM_TOKEN and TELEGRAM_CHAT_ID");
    println!("2. Optionally copy verdicts.example.json and set VERDICTS_PATH");
    println!("3. Run: homework_bot");

    Ok(())
}
