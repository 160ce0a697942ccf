use anyhow::Context;

use crate::clients::source_for;
use crate::config::Config;
use crate::services::audit_entries;

/// Fetches the dataset once and lists entries that can't be reached by a
/// search or would redirect nowhere.
pub async fn cmd_check(config: &Config, source: Option<&str>) -> anyhow::Result<()> {
    let location = source.unwrap_or(&config.dataset.source);
    let entries = source_for(location, &config.dataset)?
        .fetch()
        .await
        .with_context(|| format!("Failed to load dataset from {location}"))?;

    let problems = audit_entries(&entries);

    if problems.is_empty() {
        println!("✓ {} entries OK ({location})", entries.len());
        return Ok(());
    }

    println!("Found {} problem(s) in {location}:", problems.len());
    for problem in &problems {
        println!("  • {problem}");
    }

    anyhow::bail!("Dataset check failed")
}
