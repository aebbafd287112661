//! `ironsieve check` — evaluate policy for a call without executing it.

use anyhow::Context;
use ironsieve_config::AppConfig;
use ironsieve_policy::PolicyEngine;

pub async fn run(tool: &str, args: &str) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let args = super::parse_args(args)?;
    let policy = PolicyEngine::from_config(&config).context("Invalid policy configuration")?;

    let decision = policy.evaluate(tool, &args);
    println!("{}", serde_json::to_string_pretty(&decision)?);

    if !decision.allowed {
        std::process::exit(1);
    }
    Ok(())
}
