//! Search command handler

use anyhow::{Context, Result};

use zennav_core::{filter_categories, SearchEngine};

use super::Coordinator;
use crate::output::{Output, OutputFormat};

/// Search the web or this site's links
pub fn search(
    coordinator: &Coordinator,
    engine: SearchEngine,
    query: String,
    output: &Output,
) -> Result<()> {
    if !engine.is_external() {
        let matches = filter_categories(coordinator.committed(), &query);
        output.print_categories(&matches);
        return Ok(());
    }

    let Some(url) = engine.search_url(&query) else {
        output.message("Nothing to search for.");
        return Ok(());
    };

    // Scripted output prints the URL instead of opening it
    match output.format {
        OutputFormat::Json => {
            output.print_json(&serde_json::json!({"engine": engine.as_str(), "url": url}));
            return Ok(());
        }
        OutputFormat::Quiet => {
            println!("{}", url);
            return Ok(());
        }
        OutputFormat::Human => {}
    }

    open::that(&url).with_context(|| format!("Failed to open browser for {}", url))?;
    output.success(&format!("Opened {} search: {}", engine.name(), url));
    Ok(())
}
