//! ironsieve CLI — the main entry point.
//!
//! Commands:
//! - `run`    — Execute one tool call through the full gateway
//! - `check`  — Evaluate policy for a call without executing it
//! - `scan`   — Run the DLP scanner over text or a file
//! - `tools`  — List the enabled tools
//! - `audit`  — Query the audit trail
//! - `events` — Ingest or list captured browser events
//! - `config` — Show or initialize configuration

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "ironsieve",
    about = "ironsieve — policy, DLP, and audit gateway for AI tool calls",
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
    /// Execute a tool call through policy, DLP, and audit
    Run {
        /// Tool name (e.g. file_read, web_fetch)
        tool: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Evaluate policy for a call without executing it
    Check {
        /// Tool name
        tool: String,

        /// Arguments as a JSON object
        #[arg(short, long, default_value = "{}")]
        args: String,
    },

    /// Scan text for sensitive-data patterns
    Scan {
        /// Text to scan (reads the file at --file instead when given)
        #[arg(conflicts_with = "file")]
        text: Option<String>,

        /// Scan the contents of this file
        #[arg(short, long)]
        file: Option<String>,

        /// Location tag recorded on each finding
        #[arg(short, long, default_value = "cli:scan")]
        location: String,
    },

    /// List the enabled tools
    Tools,

    /// Query the audit trail
    Audit {
        #[command(subcommand)]
        command: commands::audit_cmd::AuditCommands,
    },

    /// Ingest or list captured browser events
    Events {
        #[command(subcommand)]
        command: commands::events::EventCommands,
    },

    /// Show or initialize configuration
    Config {
        #[command(subcommand)]
        command: commands::config_cmd::ConfigCommands,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Run { tool, args } => commands::run::run(&tool, &args).await?,
        Commands::Check { tool, args } => commands::check::run(&tool, &args).await?,
        Commands::Scan {
            text,
            file,
            location,
        } => commands::scan::run(text, file, &location).await?,
        Commands::Tools => commands::tools_cmd::run().await?,
        Commands::Audit { command } => commands::audit_cmd::run(command).await?,
        Commands::Events { command } => commands::events::run(command).await?,
        Commands::Config { command } => commands::config_cmd::run(command).await?,
    }

    Ok(())
}
