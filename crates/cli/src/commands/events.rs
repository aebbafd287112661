//! `ironsieve events` — ingest or list captured browser events.

use anyhow::Context;
use clap::Subcommand;
use ironsieve_config::AppConfig;
use ironsieve_core::{BrowserEvent, detect_ai_service};
use std::io::Read;

#[derive(Subcommand)]
pub enum EventCommands {
    /// Ingest one event as JSON (from --json or stdin)
    Ingest {
        /// The event as a JSON object
        #[arg(short, long)]
        json: Option<String>,
    },

    /// Show the most recent events
    Recent {
        /// Maximum number of events
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
}

pub async fn run(command: EventCommands) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let store = super::require_store(&config).await?;

    match command {
        EventCommands::Ingest { json } => {
            let payload = match json {
                Some(json) => json,
                None => {
                    let mut buffer = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buffer)
                        .context("Failed to read event from stdin")?;
                    buffer
                }
            };
            let mut event: BrowserEvent =
                serde_json::from_str(&payload).context("Invalid event JSON")?;

            // Classify the domain when the producer did not
            if event.ai_service.is_empty() {
                if let Some(service) = detect_ai_service(&event.domain) {
                    event.ai_service = service.name.to_string();
                }
            }

            store.record_event(&event).await?;
            println!("Event recorded for {}", event.domain);
        }
        EventCommands::Recent { limit } => {
            for event in store.recent_events(limit).await? {
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }
    Ok(())
}
