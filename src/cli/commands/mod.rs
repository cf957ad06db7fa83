//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod helpers;
mod init;
mod serve;
mod sources;
mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{load_settings_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "noticewatch")]
#[command(about = "Watch academic announcement pages and relay new posts to Telegram")]
#[command(version)]
pub struct Cli {
    /// Data directory holding noticewatch.db (overrides config file)
    #[arg(long, short = 't', global = true)]
    target: Option<PathBuf>,

    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Resolve relative paths from current working directory instead of config file location
    #[arg(long, global = true)]
    cwd: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory and database
    Init,

    /// Check all tracked sources once and deliver new announcements
    Check,

    /// Mark everything currently published as seen without sending it
    Seed,

    /// Delete seen entries older than the retention window
    Purge {
        /// Retention in days (default: from config, 90)
        #[arg(long)]
        days: Option<u32>,
    },

    /// Show delivery statistics
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage which sources are tracked
    Sources {
        #[command(subcommand)]
        command: SourcesCommands,
    },

    /// Set the check interval in minutes (5-1440)
    Interval {
        minutes: i64,
    },

    /// Start the Telegram webhook server
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },

    /// Verify the Telegram bot token
    Ping,
}

#[derive(Subcommand)]
enum SourcesCommands {
    /// List sources with their tracking state
    List,
    /// Track the source at a position
    Follow { position: i32 },
    /// Stop tracking the source at a position
    Unfollow { position: i32 },
    /// Track every source
    FollowAll,
    /// Stop tracking every source
    UnfollowAll,
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        use_cwd: cli.cwd,
        target: cli.target,
    };
    let (settings, _config) =
        load_settings_with_options(options).await.map_err(anyhow::Error::msg)?;

    match cli.command {
        Commands::Init => init::cmd_init(&settings).await,
        Commands::Check => check::cmd_check(&settings).await,
        Commands::Seed => check::cmd_seed(&settings).await,
        Commands::Purge { days } => status::cmd_purge(&settings, days).await,
        Commands::Status { json } => status::cmd_status(&settings, json).await,
        Commands::Sources { command } => match command {
            SourcesCommands::List => sources::cmd_sources_list(&settings).await,
            SourcesCommands::Follow { position } => {
                sources::cmd_sources_set(&settings, position, true).await
            }
            SourcesCommands::Unfollow { position } => {
                sources::cmd_sources_set(&settings, position, false).await
            }
            SourcesCommands::FollowAll => sources::cmd_sources_set_all(&settings, true).await,
            SourcesCommands::UnfollowAll => sources::cmd_sources_set_all(&settings, false).await,
        },
        Commands::Interval { minutes } => status::cmd_interval(&settings, minutes).await,
        Commands::Serve { bind } => serve::cmd_serve(&settings, &bind).await,
        Commands::Ping => serve::cmd_ping(&settings).await,
    }
}
