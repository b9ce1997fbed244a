//! Command handlers
//!
//! Editing commands share one flow: check the admin password against the
//! committed configuration, apply the change to an [`EditSession`], then
//! commit and mirror the draft.

pub mod category;
pub mod config;
pub mod link;
pub mod search;
pub mod site;
pub mod sync;
pub mod theme;
pub mod token;

use anyhow::{anyhow, bail, Result};

use zennav_core::{
    Category, EditSession, FileStore, GistClient, SiteConfig, StorageError, SyncCoordinator,
};

use crate::output::Output;

/// Coordinator over the on-disk store and GitHub Gists
pub type Coordinator = SyncCoordinator<FileStore, GistClient>;

/// Require the admin password of the committed configuration
pub fn authorize(coordinator: &Coordinator, password: Option<&str>) -> Result<()> {
    let Some(password) = password else {
        bail!("This command changes ZenNav. Pass --password or set ZENNAV_PASSWORD.");
    };
    if !coordinator.committed().verify_password(password) {
        bail!("Incorrect admin password.");
    }
    Ok(())
}

/// Commit the session's draft and report the mirror outcome
///
/// A failed mirror is printed as a warning and acknowledged; the command
/// still succeeds since the local save went through.
pub async fn save(coordinator: &mut Coordinator, session: EditSession, output: &Output) -> Result<()> {
    if !session.is_dirty(coordinator.committed()) {
        output.message("No changes to save.");
        return Ok(());
    }

    let draft = session.into_draft();
    let outcome = coordinator
        .commit_and_mirror(&draft)
        .await
        .map_err(storage_error)?;

    if outcome.needs_ack() {
        output.warning(&outcome.message());
        coordinator.acknowledge();
    } else {
        output.success(&outcome.message());
    }
    Ok(())
}

/// Turn a storage error into a message with its recovery hint
pub fn storage_error(e: StorageError) -> anyhow::Error {
    match e.recovery_suggestion() {
        Some(hint) => anyhow!("{}\n{}", e, hint),
        None => anyhow!(e),
    }
}

/// Resolve a category by 1-based position, id, or exact title
pub fn resolve_category(config: &SiteConfig, selector: &str) -> Result<usize> {
    if let Ok(position) = selector.parse::<usize>() {
        return to_index(position, config.categories.len())
            .ok_or_else(|| anyhow!("No category at position {}", position));
    }

    config
        .category_index(selector)
        .or_else(|| config.categories.iter().position(|c| c.title == selector))
        .ok_or_else(|| anyhow!("Category not found: {}", selector))
}

/// Resolve a link within a category by 1-based position, id, or exact title
pub fn resolve_link(category: &Category, selector: &str) -> Result<usize> {
    if let Ok(position) = selector.parse::<usize>() {
        return to_index(position, category.links.len()).ok_or_else(|| {
            anyhow!("No link at position {} in '{}'", position, category.title)
        });
    }

    category
        .links
        .iter()
        .position(|l| l.id == selector || l.title == selector)
        .ok_or_else(|| anyhow!("Link not found in '{}': {}", category.title, selector))
}

/// Convert a 1-based target position to an index (clamped later by the move)
pub fn target_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .ok_or_else(|| anyhow!("Positions start at 1"))
}

fn to_index(position: usize, len: usize) -> Option<usize> {
    (1..=len).contains(&position).then(|| position - 1)
}
