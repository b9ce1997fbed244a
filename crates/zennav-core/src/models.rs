//! Data models for ZenNav
//!
//! Defines the configuration document: `SiteConfig`, `Category` and `LinkItem`.
//! The whole `SiteConfig` is the unit of persistence and of sync; it is always
//! read and written as one JSON document.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Password used when the document does not carry one
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin";

/// Icon shown for links without a resolvable icon name
pub const DEFAULT_ICON: &str = "Globe";

/// Last id number handed out by [`generate_id`]
static LAST_ID: AtomicI64 = AtomicI64::new(0);

/// Generate a fresh id such as `link_1718000000000`
///
/// Ids are derived from the millisecond clock but never repeat within the
/// process: if the clock has not advanced, the previous value plus one is used.
pub fn generate_id(prefix: &str) -> String {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ID.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ID.compare_exchange_weak(last, next, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return format!("{}_{}", prefix, next),
            Err(actual) => last = actual,
        }
    }
}

/// A single bookmark
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LinkItem {
    /// Unique identifier
    pub id: String,
    /// Display text
    #[serde(default)]
    pub title: String,
    /// Target URL (not validated)
    #[serde(default)]
    pub url: String,
    /// Short description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Symbolic icon name, resolved by the presentation layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl LinkItem {
    /// Create a new link with a fresh id and the default icon
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: generate_id("link"),
            title: title.into(),
            url: url.into(),
            description: None,
            icon: Some(DEFAULT_ICON.to_string()),
        }
    }

    /// Icon name to display, falling back to the default symbol
    pub fn icon_or_default(&self) -> &str {
        self.icon
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ICON)
    }
}

/// An ordered, named group of links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Unique identifier
    pub id: String,
    /// Category title
    #[serde(default)]
    pub title: String,
    /// Links in display order
    #[serde(default)]
    pub links: Vec<LinkItem>,
}

impl Category {
    /// Create an empty category with a fresh id
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: generate_id("cat"),
            title: title.into(),
            links: Vec::new(),
        }
    }
}

/// The whole configuration document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site title shown in the header
    #[serde(default)]
    pub title: String,
    /// Tagline under the search bar
    #[serde(default)]
    pub description: String,
    /// Admin password (plaintext, compared for equality only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Categories in display order
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl SiteConfig {
    /// The password the editing surface should expect
    pub fn admin_password(&self) -> &str {
        self.password
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_ADMIN_PASSWORD)
    }

    /// Check an entered password
    pub fn verify_password(&self, input: &str) -> bool {
        input == self.admin_password()
    }

    /// Total number of links across all categories
    pub fn link_count(&self) -> usize {
        self.categories.iter().map(|c| c.links.len()).sum()
    }

    /// Find a category index by id
    pub fn category_index(&self, id: &str) -> Option<usize> {
        self.categories.iter().position(|c| c.id == id)
    }

    /// Built-in document used when nothing is stored locally
    ///
    /// `password` overrides the fallback admin password.
    pub fn default_document(password: Option<&str>) -> Self {
        let password = password
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_ADMIN_PASSWORD);

        Self {
            title: "我的导航".to_string(),
            description: "简约而不简单。探索数字世界的优雅入口。".to_string(),
            password: Some(password.to_string()),
            categories: vec![
                seeded_category(
                    "cat_1",
                    "日常办公",
                    &[
                        ("link_1", "Gmail", "https://mail.google.com", "高效处理邮件", "Mail"),
                        ("link_2", "GitHub", "https://github.com", "代码托管与协作", "Github"),
                        ("link_3", "ChatGPT", "https://chat.openai.com", "AI 智能助手", "Bot"),
                    ],
                ),
                seeded_category(
                    "cat_2",
                    "阅读资讯",
                    &[
                        ("link_4", "少数派", "https://sspai.com", "高效工作生活", "Zap"),
                        ("link_5", "36氪", "https://36kr.com", "科技创投媒体", "Newspaper"),
                    ],
                ),
                seeded_category(
                    "cat_3",
                    "设计灵感",
                    &[
                        ("link_6", "Dribbble", "https://dribbble.com", "全球设计灵感社区", "Dribbble"),
                        ("link_7", "Figma", "https://figma.com", "云端界面设计工具", "Figma"),
                    ],
                ),
            ],
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self::default_document(None)
    }
}

fn seeded_category(id: &str, title: &str, links: &[(&str, &str, &str, &str, &str)]) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
        links: links
            .iter()
            .map(|(id, title, url, description, icon)| LinkItem {
                id: id.to_string(),
                title: title.to_string(),
                url: url.to_string(),
                description: Some(description.to_string()),
                icon: Some(icon.to_string()),
            })
            .collect(),
    }
}

/// Color scheme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    /// Parse the stored representation
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    /// The other mode
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
