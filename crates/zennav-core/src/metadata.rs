//! Link analysis
//!
//! Suggests a title, description and icon for a URL when adding a link.
//! Analysis never fails: any problem yields [`LinkMetadata::fallback`].

use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Url;
use scraper::{Html, Selector};
use tracing::debug;

use crate::models::DEFAULT_ICON;

/// Fetch timeout in seconds
const FETCH_TIMEOUT: u64 = 10;

/// Suggested details for a link
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl LinkMetadata {
    /// Record returned when analysis could not complete
    pub fn fallback() -> Self {
        Self {
            title: Some("New link".to_string()),
            description: Some("Could not fetch details automatically".to_string()),
            icon: Some("Link".to_string()),
        }
    }
}

/// URL in, best-effort record out
#[async_trait]
pub trait LinkAnalyzer: Send + Sync {
    async fn analyze(&self, url: &str) -> LinkMetadata;
}

/// Analyzer that fetches the page and reads its meta tags
#[derive(Debug, Clone)]
pub struct HtmlAnalyzer {
    http: reqwest::Client,
}

impl HtmlAnalyzer {
    pub fn new() -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(FETCH_TIMEOUT))
            .user_agent(concat!("Mozilla/5.0 (compatible; zennav/", env!("CARGO_PKG_VERSION"), ")"))
            .build()?;
        Ok(Self { http })
    }

    async fn fetch(&self, url: &str) -> Result<LinkMetadata> {
        let parsed = Url::parse(url)?;
        let response = self.http.get(parsed.clone()).send().await?;

        if !response.status().is_success() {
            bail!("HTTP {}", response.status());
        }

        let html = response.text().await?;
        let mut metadata = parse_metadata(&html);
        metadata.icon = Some(guess_icon(&parsed).to_string());
        Ok(metadata)
    }
}

#[async_trait]
impl LinkAnalyzer for HtmlAnalyzer {
    async fn analyze(&self, url: &str) -> LinkMetadata {
        match self.fetch(url).await {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Link analysis failed for {}: {}", url, e);
                LinkMetadata::fallback()
            }
        }
    }
}

/// Parse title and description from HTML content
fn parse_metadata(html: &str) -> LinkMetadata {
    let document = Html::parse_document(html);

    LinkMetadata {
        title: extract_title(&document),
        description: extract_description(&document),
        icon: None,
    }
}

fn extract_title(document: &Html) -> Option<String> {
    extract_meta_content(document, "og:title")
        .or_else(|| extract_meta_content(document, "twitter:title"))
        .or_else(|| {
            let selector = Selector::parse("title").ok()?;
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
        })
}

fn extract_description(document: &Html) -> Option<String> {
    extract_meta_content(document, "og:description")
        .or_else(|| extract_meta_content(document, "twitter:description"))
        .or_else(|| extract_meta_content(document, "description"))
}

/// Content of a meta tag, matched by `property` (Open Graph) or `name`
fn extract_meta_content(document: &Html, key: &str) -> Option<String> {
    ["property", "name"].iter().find_map(|attr| {
        let selector = Selector::parse(&format!(r#"meta[{}="{}"]"#, attr, key)).ok()?;
        document
            .select(&selector)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Pick a symbolic icon name from the URL's host
fn guess_icon(url: &Url) -> &'static str {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);

    const RULES: &[(&[&str], &str)] = &[
        (&["github.com"], "Github"),
        (&["gitlab.com", "stackoverflow.com", "codepen.io", "crates.io"], "Code"),
        (&["youtube.com", "youtu.be", "bilibili.com"], "Youtube"),
        (&["twitter.com", "x.com"], "Twitter"),
        (&["mail.", "gmail.com", "outlook.com"], "Mail"),
        (&["docs.", "wiki", "readthedocs"], "BookOpen"),
    ];

    RULES
        .iter()
        .find(|(patterns, _)| {
            patterns.iter().any(|p| {
                if p.ends_with('.') {
                    host.starts_with(p)
                } else if p.contains('.') {
                    host == *p || host.ends_with(&format!(".{}", p))
                } else {
                    host.contains(p)
                }
            })
        })
        .map(|(_, icon)| *icon)
        .unwrap_or(DEFAULT_ICON)
}
