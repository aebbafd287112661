//! `ironsieve config` — show or initialize configuration.

use anyhow::Context;
use clap::Subcommand;
use ironsieve_config::AppConfig;
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the resolved configuration as TOML
    Show,

    /// Write a default config file
    Init {
        /// Destination path
        #[arg(short, long, default_value = "./ironsieve.toml")]
        path: String,
    },
}

pub async fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = AppConfig::load()?;
            print!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommands::Init { path } => {
            if Path::new(&path).exists() {
                anyhow::bail!("{path} already exists; not overwriting");
            }
            std::fs::write(&path, AppConfig::default_toml())
                .with_context(|| format!("Failed to write {path}"))?;
            println!("Wrote default configuration to {path}");
        }
    }
    Ok(())
}
