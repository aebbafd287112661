//! `ironsieve audit` — query the audit trail.

use clap::Subcommand;
use ironsieve_config::AppConfig;

#[derive(Subcommand)]
pub enum AuditCommands {
    /// Show the most recent audit entries
    Recent {
        /// Maximum number of entries
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Aggregate DLP findings by pattern
    Summary,

    /// Invocation counts per tool over the recent window
    Tools,

    /// Per-session activity over the recent window
    Sessions,
}

pub async fn run(command: AuditCommands) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let store = super::require_store(&config).await?;

    match command {
        AuditCommands::Recent { limit } => {
            for entry in store.recent(limit).await? {
                println!("{}", serde_json::to_string(&entry)?);
            }
        }
        AuditCommands::Summary => {
            let summary = store.summary().await?;
            if summary.is_empty() {
                println!("No findings recorded.");
                return Ok(());
            }
            for row in &summary {
                println!("{:<10} {:<20} {}", row.severity, row.pattern, row.count);
            }
        }
        AuditCommands::Tools => {
            for stat in store.tool_stats().await? {
                println!("{:<12} {}", stat.tool_name, stat.count);
            }
        }
        AuditCommands::Sessions => {
            for session in store.sessions().await? {
                println!("{}", serde_json::to_string(&session)?);
            }
        }
    }
    Ok(())
}
