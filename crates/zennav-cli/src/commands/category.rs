//! Category command handlers

use anyhow::Result;

use super::{authorize, resolve_category, save, target_index, Coordinator};
use crate::output::Output;

pub async fn add(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    title: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;

    let mut session = coordinator.begin_edit();
    let id = session.add_category(title.as_str());
    output.message(&format!("Added category '{}' ({})", title, id));
    save(coordinator, session, output).await
}

pub async fn rename(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    title: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let idx = resolve_category(coordinator.committed(), &category)?;

    let mut session = coordinator.begin_edit();
    session.rename_category(idx, title)?;
    save(coordinator, session, output).await
}

/// Delete a category together with its links
pub async fn delete(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let idx = resolve_category(coordinator.committed(), &category)?;

    let mut session = coordinator.begin_edit();
    let removed = session.delete_category(idx)?;
    output.message(&format!(
        "Deleted category '{}' and {} link(s)",
        removed.title,
        removed.links.len()
    ));
    save(coordinator, session, output).await
}

/// Move a category to a 1-based position
pub async fn move_to(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    position: usize,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let from = resolve_category(coordinator.committed(), &category)?;
    let to = target_index(position)?;

    let mut session = coordinator.begin_edit();
    session.begin_category_drag(from)?;
    session.drop_category(to)?;
    save(coordinator, session, output).await
}
