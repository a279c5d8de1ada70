mod commands;
mod output;

use std::{path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use miette::Result;
use reqcheck_core::{BotConfig, RosterSort};
use tracing::info;

#[derive(Parser)]
#[command(name = "reqcheck")]
#[command(about = "Guild requirement checks for Hypixel players, on Discord or in a terminal")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (defaults to $REQCHECK_CONFIG or reqcheck.toml)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the Discord bot (default)
    Bot,
    /// Check one player against the guild requirements
    Check {
        /// Minecraft username
        username: String,
    },
    /// Check every member of the configured guild
    Roster {
        /// Sort members by this metric, descending
        #[arg(long, value_parser = RosterSort::CHOICES)]
        sort: Option<String>,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration with secrets masked
    Show,
}

fn log_filter(debug: bool) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    if debug {
        EnvFilter::new(
            "reqcheck_core=debug,reqcheck_discord=debug,reqcheck=debug,serenity=info,warn",
        )
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(
                "reqcheck_core=info,reqcheck_discord=info,reqcheck=info,serenity=warn,warn",
            )
        })
    }
}

fn init_logging(debug: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    // Create logs directory if it doesn't exist
    std::fs::create_dir_all("logs").ok();

    let file_appender = tracing_appender::rolling::daily("logs", "reqcheck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Leak the guard to keep it alive for the entire program
    Box::leak(Box::new(guard));

    tracing_subscriber::registry()
        .with(log_filter(debug))
        .with(
            // Console output
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_line_number(true)
                .compact(),
        )
        .with(
            // File output
            tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_ansi(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .with_cause_chain()
                .color(true)
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();
    let cli = Cli::parse();

    init_logging(cli.debug);

    match &cli.config {
        Some(path) => info!("Loading config from: {:?}", path),
        None => info!("Loading config from environment and default locations"),
    }
    let config = BotConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Commands::Bot) {
        Commands::Bot => {
            info!(
                "Checking guild {} for staff role {}",
                config.guild_name, config.discord.staff_role_id
            );
            reqcheck_discord::run_discord_bot(Arc::new(config)).await?
        }
        Commands::Check { username } => commands::check::player(&config, &username).await?,
        Commands::Roster { sort } => {
            let sort = RosterSort::parse_lenient(sort.as_deref());
            commands::check::roster(&config, sort).await?
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => commands::config::show(&config)?,
        },
    }

    Ok(())
}
