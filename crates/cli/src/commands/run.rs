//! `ironsieve run` — execute one tool call through the full gateway.

use ironsieve_config::AppConfig;
use ironsieve_core::CallContext;

pub async fn run(tool: &str, args: &str) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let args = super::parse_args(args)?;
    let gateway = super::build_gateway(&config).await?;
    let ctx = CallContext::new(config.resolve_user());

    match gateway.intercept(&ctx, tool, args).await {
        Ok(result) => {
            println!("{}", result.output);
            Ok(())
        }
        Err(e) => {
            // The denial or failure is already audited; surface it as
            // the process exit.
            Err(e.into())
        }
    }
}
