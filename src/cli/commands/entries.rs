use anyhow::Context;

use crate::cli::console::print_entries;
use crate::clients::source_for;
use crate::config::Config;

pub async fn cmd_entries(config: &Config, source: Option<&str>) -> anyhow::Result<()> {
    let location = source.unwrap_or(&config.dataset.source);
    let entries = source_for(location, &config.dataset)?
        .fetch()
        .await
        .with_context(|| format!("Failed to load dataset from {location}"))?;

    if entries.is_empty() {
        println!("Dataset at {location} is empty.");
        return Ok(());
    }

    println!("Destinations ({} total)", entries.len());
    println!("{:-<60}", "");
    print_entries(&entries);

    Ok(())
}
