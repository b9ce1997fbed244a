//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use zennav_core::{Category, LinkItem, SiteConfig};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print any serializable value as pretty JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to encode output: {}", e),
        }
    }

    /// Print the site header and every category
    pub fn print_site(&self, config: &SiteConfig) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", config.title);
                if !config.description.is_empty() {
                    println!("{}", config.description);
                }
                println!();
                self.print_categories(&config.categories);
            }
            OutputFormat::Json => {
                self.print_json(&serde_json::json!({
                    "title": config.title,
                    "description": config.description,
                    "categories": config.categories,
                }));
            }
            OutputFormat::Quiet => {
                for category in &config.categories {
                    println!("{}", category.id);
                }
            }
        }
    }

    /// Print categories with their links, numbered from 1
    pub fn print_categories(&self, categories: &[Category]) {
        match self.format {
            OutputFormat::Human => {
                if categories.is_empty() {
                    println!("No links found.");
                    return;
                }
                for (i, category) in categories.iter().enumerate() {
                    println!("[{}] {} ({} links)", i + 1, category.title, category.links.len());
                    for (j, link) in category.links.iter().enumerate() {
                        println!(
                            "    {:>2}. {} | {}{}",
                            j + 1,
                            truncate(&link.title, 30),
                            truncate(&link.url, 45),
                            link.description
                                .as_deref()
                                .map(|d| format!(" | {}", truncate(d, 40)))
                                .unwrap_or_default()
                        );
                    }
                }
                let links: usize = categories.iter().map(|c| c.links.len()).sum();
                println!("\n{} categories, {} link(s)", categories.len(), links);
            }
            OutputFormat::Json => self.print_json(categories),
            OutputFormat::Quiet => {
                for link in categories.iter().flat_map(|c| &c.links) {
                    println!("{}", link.url);
                }
            }
        }
    }

    /// Print a single link
    pub fn print_link(&self, link: &LinkItem) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:          {}", link.id);
                println!("Title:       {}", link.title);
                println!("URL:         {}", link.url);
                if let Some(ref desc) = link.description {
                    println!("Description: {}", desc);
                }
                println!("Icon:        {}", link.icon_or_default());
            }
            OutputFormat::Json => self.print_json(link),
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a warning that does not fail the command
    pub fn warning(&self, message: &str) {
        match self.format {
            OutputFormat::Human => eprintln!("⚠ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            // Warnings still reach stderr in quiet mode
            OutputFormat::Quiet => eprintln!("{}", message),
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("简约而不简单", 6), "简约而不简单");
        assert_eq!(truncate("简约而不简单。探索", 6), "简约而...");
    }
}
