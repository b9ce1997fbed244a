//! Edit session
//!
//! An `EditSession` owns a private copy of the configuration (the draft) plus
//! the transient state of the editing surface: which panel is active and which
//! item a drag started from. Nothing here touches the committed configuration;
//! the draft only becomes committed when it is handed to
//! [`SyncCoordinator::commit_and_mirror`](crate::sync::SyncCoordinator::commit_and_mirror).

use std::str::FromStr;

use thiserror::Error;

use crate::metadata::LinkMetadata;
use crate::models::{Category, LinkItem, SiteConfig, DEFAULT_ICON};

/// Errors from draft mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("No category at position {0}")]
    CategoryOutOfRange(usize),

    #[error("No link at position {link} in category {category}")]
    LinkOutOfRange { category: usize, link: usize },

    #[error("Unknown field '{0}'")]
    UnknownField(String),
}

/// Panel shown by the editing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// Site title, description and password
    Global,
    /// Sync token and push/pull
    Sync,
    /// One category's links
    Category(usize),
}

/// Editable site-level fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteField {
    Title,
    Description,
    Password,
}

impl FromStr for SiteField {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(SiteField::Title),
            "description" => Ok(SiteField::Description),
            "password" => Ok(SiteField::Password),
            other => Err(SessionError::UnknownField(other.to_string())),
        }
    }
}

/// Editable link fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Title,
    Url,
    Description,
    Icon,
}

impl FromStr for LinkField {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "title" => Ok(LinkField::Title),
            "url" => Ok(LinkField::Url),
            "description" => Ok(LinkField::Description),
            "icon" => Ok(LinkField::Icon),
            other => Err(SessionError::UnknownField(other.to_string())),
        }
    }
}

/// Working copy of the configuration plus editor state
#[derive(Debug, Clone)]
pub struct EditSession {
    draft: SiteConfig,
    active_panel: Panel,
    dragged_category: Option<usize>,
    dragged_link: Option<usize>,
}

impl EditSession {
    /// Start a session on a copy of `committed`
    pub fn new(committed: &SiteConfig) -> Self {
        Self {
            draft: committed.clone(),
            active_panel: Panel::Global,
            dragged_category: None,
            dragged_link: None,
        }
    }

    pub fn draft(&self) -> &SiteConfig {
        &self.draft
    }

    pub fn into_draft(self) -> SiteConfig {
        self.draft
    }

    /// Whether the draft differs from `committed`
    pub fn is_dirty(&self, committed: &SiteConfig) -> bool {
        &self.draft != committed
    }

    /// Replace the whole draft (e.g. after a pull)
    pub fn replace_draft(&mut self, config: SiteConfig) {
        self.draft = config;
        self.dragged_category = None;
        self.dragged_link = None;
        if let Panel::Category(idx) = self.active_panel {
            if idx >= self.draft.categories.len() {
                self.active_panel = Panel::Global;
            }
        }
    }

    pub fn active_panel(&self) -> Panel {
        self.active_panel
    }

    pub fn set_active_panel(&mut self, panel: Panel) -> Result<(), SessionError> {
        if let Panel::Category(idx) = panel {
            self.category(idx)?;
        }
        self.active_panel = panel;
        Ok(())
    }

    // ==================== Site ====================

    /// Set a site-level field; an empty password clears it
    pub fn set_site_field(&mut self, field: SiteField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SiteField::Title => self.draft.title = value,
            SiteField::Description => self.draft.description = value,
            SiteField::Password => {
                self.draft.password = if value.is_empty() { None } else { Some(value) };
            }
        }
    }

    // ==================== Categories ====================

    /// Append a new category and make it the active panel
    pub fn add_category(&mut self, title: impl Into<String>) -> String {
        let category = Category::new(title);
        let id = category.id.clone();
        self.draft.categories.push(category);
        self.active_panel = Panel::Category(self.draft.categories.len() - 1);
        id
    }

    pub fn rename_category(&mut self, idx: usize, title: impl Into<String>) -> Result<(), SessionError> {
        self.category_mut(idx)?.title = title.into();
        Ok(())
    }

    /// Delete a category together with its links
    pub fn delete_category(&mut self, idx: usize) -> Result<Category, SessionError> {
        self.category(idx)?;
        let removed = self.draft.categories.remove(idx);

        // Step the selection back one position
        self.active_panel = match self.active_panel {
            Panel::Category(active) if active > 0 => Panel::Category(active - 1),
            _ => Panel::Global,
        };
        Ok(removed)
    }

    /// Move a category; the active category stays selected
    pub fn move_category(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        self.category(from)?;
        let active_id = match self.active_panel {
            Panel::Category(idx) => self.draft.categories.get(idx).map(|c| c.id.clone()),
            _ => None,
        };

        if !move_item(&mut self.draft.categories, from, to) {
            return Ok(());
        }

        if let Some(id) = active_id {
            if let Some(idx) = self.draft.category_index(&id) {
                self.active_panel = Panel::Category(idx);
            }
        }
        Ok(())
    }

    pub fn begin_category_drag(&mut self, idx: usize) -> Result<(), SessionError> {
        self.category(idx)?;
        self.dragged_category = Some(idx);
        Ok(())
    }

    /// Drop the dragged category at `target`; returns false if nothing moved
    pub fn drop_category(&mut self, target: usize) -> Result<bool, SessionError> {
        let Some(from) = self.dragged_category.take() else {
            return Ok(false);
        };
        if from == target {
            return Ok(false);
        }
        self.move_category(from, target)?;
        Ok(true)
    }

    // ==================== Links ====================

    /// Append a link to a category
    pub fn add_link(&mut self, cat_idx: usize, link: LinkItem) -> Result<String, SessionError> {
        let id = link.id.clone();
        self.category_mut(cat_idx)?.links.push(link);
        Ok(id)
    }

    /// Set one field of a link; empty description or icon clears it
    pub fn update_link(
        &mut self,
        cat_idx: usize,
        link_idx: usize,
        field: LinkField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let value = value.into();
        let link = self.link_mut(cat_idx, link_idx)?;
        match field {
            LinkField::Title => link.title = value,
            LinkField::Url => link.url = value,
            LinkField::Description => link.description = non_empty(value),
            LinkField::Icon => link.icon = non_empty(value),
        }
        Ok(())
    }

    pub fn delete_link(&mut self, cat_idx: usize, link_idx: usize) -> Result<LinkItem, SessionError> {
        self.link_mut(cat_idx, link_idx)?;
        Ok(self.draft.categories[cat_idx].links.remove(link_idx))
    }

    /// Move a link within its category
    pub fn move_link(&mut self, cat_idx: usize, from: usize, to: usize) -> Result<(), SessionError> {
        self.link_mut(cat_idx, from)?;
        move_item(&mut self.draft.categories[cat_idx].links, from, to);
        Ok(())
    }

    pub fn begin_link_drag(&mut self, link_idx: usize) -> Result<(), SessionError> {
        if let Panel::Category(cat_idx) = self.active_panel {
            self.link_mut(cat_idx, link_idx)?;
        }
        self.dragged_link = Some(link_idx);
        Ok(())
    }

    /// Drop the dragged link at `target` within the active category
    ///
    /// Returns false if nothing moved, including when no category is active.
    pub fn drop_link(&mut self, target: usize) -> Result<bool, SessionError> {
        let Some(from) = self.dragged_link.take() else {
            return Ok(false);
        };
        let Panel::Category(cat_idx) = self.active_panel else {
            return Ok(false);
        };
        if from == target {
            return Ok(false);
        }
        self.move_link(cat_idx, from, target)?;
        Ok(true)
    }

    /// Fill a link from analysed metadata
    ///
    /// Title and description the user already typed are kept; an analysed
    /// icon replaces the current one.
    pub fn apply_metadata(
        &mut self,
        cat_idx: usize,
        link_idx: usize,
        metadata: &LinkMetadata,
    ) -> Result<(), SessionError> {
        let link = self.link_mut(cat_idx, link_idx)?;

        if link.title.is_empty() {
            link.title = metadata.title.clone().unwrap_or_default();
        }
        if link.description.as_deref().map_or(true, str::is_empty) {
            link.description = metadata.description.clone().and_then(non_empty);
        }
        link.icon = metadata
            .icon
            .clone()
            .and_then(non_empty)
            .or_else(|| link.icon.clone().and_then(non_empty))
            .or_else(|| Some(DEFAULT_ICON.to_string()));
        Ok(())
    }

    fn category(&self, idx: usize) -> Result<&Category, SessionError> {
        self.draft
            .categories
            .get(idx)
            .ok_or(SessionError::CategoryOutOfRange(idx))
    }

    fn category_mut(&mut self, idx: usize) -> Result<&mut Category, SessionError> {
        self.draft
            .categories
            .get_mut(idx)
            .ok_or(SessionError::CategoryOutOfRange(idx))
    }

    fn link_mut(&mut self, cat_idx: usize, link_idx: usize) -> Result<&mut LinkItem, SessionError> {
        self.category_mut(cat_idx)?
            .links
            .get_mut(link_idx)
            .ok_or(SessionError::LinkOutOfRange {
                category: cat_idx,
                link: link_idx,
            })
    }
}

/// Remove the item at `from` and insert it at `to` (clamped to the end)
///
/// Returns false when nothing moved.
fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() {
        return false;
    }
    let item = items.remove(from);
    let to = to.min(items.len());
    items.insert(to, item);
    true
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
