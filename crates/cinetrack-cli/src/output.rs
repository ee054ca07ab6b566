//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use cinetrack_core::{CatalogItem, UserProfile};

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

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single catalog item with its details
    pub fn print_item(&self, item: &CatalogItem) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", item.id());
                println!("Kind:     {}", item.kind());
                println!("Title:    {}", item.display_title());
                if let Some(date) = item.air_date() {
                    println!("Released: {}", date.format("%Y-%m-%d"));
                }
                if let Some(rating) = item.rating() {
                    println!("Rating:   {:.1}", rating);
                }
                if let Some(overview) = item.overview() {
                    println!("Overview: {}", truncate(overview, 200));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(item).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", item.id());
            }
        }
    }

    /// Print a list of catalog items
    pub fn print_items(&self, items: &[CatalogItem]) {
        match self.format {
            OutputFormat::Human => {
                if items.is_empty() {
                    println!("No items found.");
                    return;
                }
                for item in items {
                    let year = item
                        .air_date()
                        .map(|d| d.format("%Y").to_string())
                        .unwrap_or_else(|| "----".to_string());
                    let rating = item
                        .rating()
                        .map(|r| format!("{:.1}", r))
                        .unwrap_or_else(|| "N/A".to_string());
                    println!(
                        "{:>9} | {:5} | {} | {} ({})",
                        item.id(),
                        item.kind(),
                        rating,
                        truncate(item.display_title(), 50),
                        year
                    );
                }
                println!("\n{} item(s)", items.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(items).unwrap());
            }
            OutputFormat::Quiet => {
                for item in items {
                    println!("{}", item.id());
                }
            }
        }
    }

    /// Print the signed-in user
    pub fn print_profile(&self, profile: &UserProfile) {
        match self.format {
            OutputFormat::Human => {
                println!("Username:     {}", profile.username);
                println!("Display name: {}", profile.display_name);
                println!("Email:        {}", profile.email);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(profile).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", profile.username);
            }
        }
    }

    /// Print recent search queries, most recent first
    pub fn print_history(&self, queries: &[String]) {
        match self.format {
            OutputFormat::Human => {
                if queries.is_empty() {
                    println!("No search history.");
                    return;
                }
                for (i, query) in queries.iter().enumerate() {
                    println!("{:>2}. {}", i + 1, query);
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(queries).unwrap());
            }
            OutputFormat::Quiet => {
                for query in queries {
                    println!("{}", query);
                }
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

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
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
        // Must not split inside a multi-byte character
        assert_eq!(truncate("مسلسل طويل جدا هنا", 10), "مسلسل ط...");
    }
}
