//! `ironsieve tools` — list the enabled tools.

use ironsieve_config::AppConfig;
use ironsieve_tools::{builtin_registry, enabled_definitions};

pub async fn run() -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let registry = builtin_registry(&config);

    let definitions = enabled_definitions(&registry, &config);
    if definitions.is_empty() {
        println!("No tools enabled.");
        return Ok(());
    }

    for def in &definitions {
        println!("{:<12} {}", def.name, def.description);
    }
    Ok(())
}
