//! Sync command handlers

use anyhow::{bail, Result};

use zennav_core::remote::SnapshotLookup;
use zennav_core::{SnapshotStore, SyncOutcome};

use super::{authorize, save, Coordinator};
use crate::output::{Output, OutputFormat};

/// Upload the committed configuration
pub async fn push(coordinator: &mut Coordinator, password: Option<&str>, output: &Output) -> Result<()> {
    authorize(coordinator, password)?;
    output.message("Uploading configuration...");

    let outcome = coordinator.push().await;
    finish(coordinator, outcome, output)
}

/// Download the snapshot; with `apply` it is saved as the new configuration
pub async fn pull(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    apply: bool,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    output.message("Downloading configuration...");

    let mut session = coordinator.begin_edit();
    let outcome = coordinator.pull(&mut session).await;
    finish(coordinator, outcome, output)?;

    let draft = session.draft();
    output.message(&format!(
        "Cloud configuration: {} categories, {} link(s)",
        draft.categories.len(),
        draft.link_count()
    ));

    if apply {
        save(coordinator, session, output).await
    } else {
        output.message("Nothing was saved. Run `zennav sync pull --save` to use it.");
        Ok(())
    }
}

/// Show sync settings and whether a snapshot exists
pub async fn status(coordinator: &Coordinator, output: &Output) -> Result<()> {
    let token = coordinator.local().credential();
    let snapshot = if token.is_empty() {
        None
    } else {
        Some(coordinator.remote().find_snapshot(&token).await)
    };

    let snapshot_text = match &snapshot {
        None => "(no token)".to_string(),
        Some(SnapshotLookup::Found(r)) => format!("found ({})", r),
        Some(SnapshotLookup::NotFound) => "not found".to_string(),
        Some(SnapshotLookup::Failed(reason)) => format!("lookup failed: {}", reason),
    };

    match output.format {
        OutputFormat::Json => output.print_json(&serde_json::json!({
            "token_configured": !token.is_empty(),
            "api_url": coordinator.remote().base_url(),
            "snapshot": snapshot_text,
        })),
        OutputFormat::Quiet => println!("{}", snapshot_text),
        OutputFormat::Human => {
            println!("Sync:");
            println!(
                "  token:    {}",
                if token.is_empty() { "not set" } else { "set" }
            );
            println!("  api:      {}", coordinator.remote().base_url());
            println!("  snapshot: {}", snapshot_text);
        }
    }
    Ok(())
}

/// Report an explicit push or pull and clear its status
fn finish(coordinator: &mut Coordinator, outcome: SyncOutcome, output: &Output) -> Result<()> {
    coordinator.acknowledge();
    if outcome.is_success() {
        output.success(&outcome.message());
        Ok(())
    } else {
        bail!(outcome.message())
    }
}
