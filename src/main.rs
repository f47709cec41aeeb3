use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;

use zuschauer_bot::application::errors::BotError;
use zuschauer_bot::application::services::{BotSession, StopReason};
use zuschauer_bot::domain::entities::CommandTable;
use zuschauer_bot::domain::traits::Bot;
use zuschauer_bot::infrastructure::adapters::{ConsoleAdapter, SlackAdapter};
use zuschauer_bot::infrastructure::config::{AdapterKind, Config, Credentials};
use zuschauer_bot::infrastructure::logging::LoggingConfig;

/// Exit status when config, credentials or identity are unusable
const STARTUP_FAILURE: u8 = 2;

#[derive(Parser)]
#[command(name = "zuschauer-bot")]
#[command(about = "A chat bot that answers commands addressed to it by mention", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Logging config file path
    #[arg(short, long, default_value = "logging.yaml")]
    logging: String,

    /// Bot token (overrides BOT_USER_TOKEN)
    #[arg(short, long)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot
    Run,
    /// Show version
    Version,
    /// Generate default config
    InitConfig,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run => run_bot(&cli.config, &cli.logging, cli.token),
        Commands::Version => {
            println!("zuschauer-bot v{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::InitConfig => init_config(),
    }
}

fn run_bot(config_path: &str, logging_path: &str, token_override: Option<String>) -> ExitCode {
    // RUST_LOG may come from .env, so load it before building the filter
    let dotenv = dotenvy::dotenv();

    // No logger exists until this succeeds, so report straight to stderr
    if let Err(e) = LoggingConfig::load(logging_path).and_then(|logging| logging.init()) {
        eprintln!("Failed to set up logging from {}: {}", logging_path, e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = dotenv {
        tracing::debug!("No .env loaded: {}", e);
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(serve(config_path, token_override)) {
        Ok(reason) => {
            tracing::info!("Completed ({:?})", reason);
            ExitCode::SUCCESS
        }
        Err(e) if e.is_fatal_startup() => {
            tracing::error!("Startup failed: {}", e);
            ExitCode::from(STARTUP_FAILURE)
        }
        Err(e) => {
            tracing::error!("Fatal: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: &str, token_override: Option<String>) -> Result<StopReason, BotError> {
    let config = Config::load_or_default(config_path)?;
    tracing::info!("Starting {}", config.bot.name);

    let (bot, bot_id): (Arc<dyn Bot>, Option<String>) = match config.adapter {
        AdapterKind::Slack => {
            let credentials = Credentials::from_env(token_override)?;
            tracing::debug!("Using {:?}", credentials);
            let bot = SlackAdapter::new(credentials.token, config.slack.api_base.clone());
            (Arc::new(bot), credentials.bot_id)
        }
        AdapterKind::Console => (Arc::new(ConsoleAdapter::new()), None),
    };

    let mut session = BotSession::new(bot, CommandTable::standard(), config.session_settings());
    session.start(bot_id).await?;
    session.run().await
}

fn init_config() -> ExitCode {
    match Config::default().to_yaml() {
        Ok(yaml) => {
            println!("{}", yaml);
            println!("\nSave this to config.yaml and adjust as needed.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to render default config: {}", e);
            ExitCode::FAILURE
        }
    }
}
