//! Search
//!
//! External engines turn a query into a results URL; the `site` engine
//! filters the configuration's own links instead.

use std::str::FromStr;

use reqwest::Url;

use crate::models::{Category, SiteConfig};

/// Available search engines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchEngine {
    #[default]
    Google,
    Baidu,
    Bing,
    Github,
    /// Search within the configured links
    Site,
}

impl SearchEngine {
    pub const ALL: [SearchEngine; 5] = [
        SearchEngine::Google,
        SearchEngine::Baidu,
        SearchEngine::Bing,
        SearchEngine::Github,
        SearchEngine::Site,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Baidu => "baidu",
            SearchEngine::Bing => "bing",
            SearchEngine::Github => "github",
            SearchEngine::Site => "site",
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            SearchEngine::Google => "Google",
            SearchEngine::Baidu => "Baidu",
            SearchEngine::Bing => "Bing",
            SearchEngine::Github => "GitHub",
            SearchEngine::Site => "This site",
        }
    }

    /// Results page and query parameter, `None` for in-site search
    fn template(&self) -> Option<(&'static str, &'static str)> {
        match self {
            SearchEngine::Google => Some(("https://www.google.com/search", "q")),
            SearchEngine::Baidu => Some(("https://www.baidu.com/s", "wd")),
            SearchEngine::Bing => Some(("https://www.bing.com/search", "q")),
            SearchEngine::Github => Some(("https://github.com/search", "q")),
            SearchEngine::Site => None,
        }
    }

    pub fn is_external(&self) -> bool {
        self.template().is_some()
    }

    /// Results URL for `query`
    ///
    /// Returns `None` for a blank query or the in-site engine.
    pub fn search_url(&self, query: &str) -> Option<String> {
        if query.trim().is_empty() {
            return None;
        }
        let (base, param) = self.template()?;
        Url::parse_with_params(base, &[(param, query)])
            .ok()
            .map(String::from)
    }
}

impl FromStr for SearchEngine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SearchEngine::ALL
            .into_iter()
            .find(|engine| engine.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown search engine '{}'. Use one of: google, baidu, bing, github, site",
                    s
                )
            })
    }
}

impl std::fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categories whose links match `query`
///
/// Matching is a case-insensitive substring test on title, description and
/// url. Categories with no matching links are dropped. A blank query returns
/// every category unchanged.
pub fn filter_categories(config: &SiteConfig, query: &str) -> Vec<Category> {
    if query.trim().is_empty() {
        return config.categories.clone();
    }

    let needle = query.to_lowercase();
    config
        .categories
        .iter()
        .filter_map(|category| {
            let links: Vec<_> = category
                .links
                .iter()
                .filter(|link| {
                    link.title.to_lowercase().contains(&needle)
                        || link
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(&needle))
                        || link.url.to_lowercase().contains(&needle)
                })
                .cloned()
                .collect();

            (!links.is_empty()).then(|| Category {
                links,
                ..category.clone()
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LinkItem;

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            SearchEngine::Google.search_url("rust async").as_deref(),
            Some("https://www.google.com/search?q=rust+async")
        );
        assert_eq!(
            SearchEngine::Baidu.search_url("a&b").as_deref(),
            Some("https://www.baidu.com/s?wd=a%26b")
        );
        assert!(SearchEngine::Github.search_url("  ").is_none());
        assert!(SearchEngine::Site.search_url("rust").is_none());
    }

    #[test]
    fn test_parse_engine() {
        assert_eq!("GitHub".parse::<SearchEngine>(), Ok(SearchEngine::Github));
        assert_eq!("site".parse::<SearchEngine>(), Ok(SearchEngine::Site));
        assert!("yahoo".parse::<SearchEngine>().is_err());
        assert!(!SearchEngine::Site.is_external());
    }

    #[test]
    fn test_filter_matches_title_description_url() {
        let mut config = SiteConfig::default();
        let mut link = LinkItem::new("Crates", "https://crates.io");
        link.description = Some("Rust PACKAGE registry".to_string());
        config.categories[2].links.push(link);

        let by_description = filter_categories(&config, "package");
        assert_eq!(by_description.len(), 1);
        assert_eq!(by_description[0].id, config.categories[2].id);
        assert_eq!(by_description[0].links.len(), 1);

        let by_url = filter_categories(&config, "CRATES.IO");
        assert_eq!(by_url[0].links[0].title, "Crates");
    }

    #[test]
    fn test_filter_drops_empty_categories() {
        let config = SiteConfig::default();
        assert!(filter_categories(&config, "no-such-link-anywhere").is_empty());
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let config = SiteConfig::default();
        assert_eq!(filter_categories(&config, " "), config.categories);
    }
}
