//! `ironsieve scan` — run the DLP scanner over text or a file.

use anyhow::Context;
use ironsieve_config::AppConfig;

pub async fn run(text: Option<String>, file: Option<String>, location: &str) -> anyhow::Result<()> {
    let config = AppConfig::load()?;
    let scanner = super::build_scanner(&config)?;

    let content = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {path}"))?,
        (None, None) => anyhow::bail!("Provide text to scan or --file"),
    };

    let findings = scanner.scan(&content, location);
    if findings.is_empty() {
        println!("No findings.");
        return Ok(());
    }

    for finding in &findings {
        println!(
            "{:<10} {:<20} {:<24} {}",
            finding.severity, finding.pattern, finding.location, finding.redacted_sample
        );
    }
    println!();
    println!("{} finding(s)", findings.len());
    Ok(())
}
