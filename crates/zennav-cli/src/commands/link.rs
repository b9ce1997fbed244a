//! Link command handlers

use anyhow::{bail, Result};

use zennav_core::{HtmlAnalyzer, LinkAnalyzer, LinkField, LinkItem, Panel};

use super::{authorize, resolve_category, resolve_link, save, target_index, Coordinator};
use crate::output::Output;

/// Fields for a new link
pub struct NewLink {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub analyze: bool,
}

/// Add a link to a category
///
/// Without a title the page is analysed for one.
pub async fn add(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    new: NewLink,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    if new.url.trim().is_empty() {
        bail!("A link needs a URL.");
    }
    let cat_idx = resolve_category(coordinator.committed(), &category)?;

    let mut link = LinkItem::new(new.title.clone().unwrap_or_default(), new.url.trim());
    link.description = new.description;
    if new.icon.is_some() {
        link.icon = new.icon;
    }

    let mut session = coordinator.begin_edit();
    session.add_link(cat_idx, link)?;
    let link_idx = session.draft().categories[cat_idx].links.len() - 1;

    if new.analyze || new.title.is_none() {
        output.message(&format!("Analysing {}...", new.url));
        let metadata = HtmlAnalyzer::new()?.analyze(&new.url).await;
        session.apply_metadata(cat_idx, link_idx, &metadata)?;
    }

    output.print_link(&session.draft().categories[cat_idx].links[link_idx]);
    save(coordinator, session, output).await
}

/// Set one field of a link
pub async fn edit(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    link: String,
    field: String,
    value: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let field: LinkField = field.parse()?;
    let cat_idx = resolve_category(coordinator.committed(), &category)?;
    let link_idx = resolve_link(&coordinator.committed().categories[cat_idx], &link)?;

    let mut session = coordinator.begin_edit();
    session.update_link(cat_idx, link_idx, field, value)?;
    save(coordinator, session, output).await
}

pub async fn delete(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    link: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let cat_idx = resolve_category(coordinator.committed(), &category)?;
    let link_idx = resolve_link(&coordinator.committed().categories[cat_idx], &link)?;

    let mut session = coordinator.begin_edit();
    let removed = session.delete_link(cat_idx, link_idx)?;
    output.message(&format!("Deleted link '{}'", removed.title));
    save(coordinator, session, output).await
}

/// Move a link to a 1-based position within its category
pub async fn move_to(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    link: String,
    position: usize,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let cat_idx = resolve_category(coordinator.committed(), &category)?;
    let from = resolve_link(&coordinator.committed().categories[cat_idx], &link)?;
    let to = target_index(position)?;

    let mut session = coordinator.begin_edit();
    session.set_active_panel(Panel::Category(cat_idx))?;
    session.begin_link_drag(from)?;
    session.drop_link(to)?;
    save(coordinator, session, output).await
}

/// Re-analyse an existing link's page
pub async fn analyze(
    coordinator: &mut Coordinator,
    password: Option<&str>,
    category: String,
    link: String,
    output: &Output,
) -> Result<()> {
    authorize(coordinator, password)?;
    let cat_idx = resolve_category(coordinator.committed(), &category)?;
    let link_idx = resolve_link(&coordinator.committed().categories[cat_idx], &link)?;
    let url = coordinator.committed().categories[cat_idx].links[link_idx].url.clone();

    output.message(&format!("Analysing {}...", url));
    let metadata = HtmlAnalyzer::new()?.analyze(&url).await;

    let mut session = coordinator.begin_edit();
    session.apply_metadata(cat_idx, link_idx, &metadata)?;
    output.print_link(&session.draft().categories[cat_idx].links[link_idx]);
    save(coordinator, session, output).await
}
