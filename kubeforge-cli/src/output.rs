//! Output formatting for CLI
//!
//! Every command prints through these helpers so table, JSON and YAML output
//! look the same everywhere.

use colored::Colorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Unknown names fall back to a table
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            "yaml" | "yml" => OutputFormat::Yaml,
            _ => OutputFormat::Table,
        }
    }
}

/// Print rows in the specified format (table, JSON, or YAML)
pub fn print_output<T: Tabled + Serialize>(data: Vec<T>, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(&data)?,
        OutputFormat::Yaml => print_yaml(&data)?,
    }
    Ok(())
}

/// Print a single item; table format falls back to pretty JSON
pub fn print_single<T: Serialize>(data: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table | OutputFormat::Json => print_json(data)?,
        OutputFormat::Yaml => print_yaml(data)?,
    }
    Ok(())
}

pub fn print_table<T: Tabled>(data: Vec<T>) {
    if data.is_empty() {
        println!("{}", "No results found".yellow());
        return;
    }

    let table = Table::new(data);
    println!("{}", table);
}

pub fn print_json<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{}", json);
    Ok(())
}

pub fn print_yaml<T: Serialize>(data: &T) -> anyhow::Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    println!("{}", yaml);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}

pub fn print_created(resource_type: &str, name: &str, id: &str) {
    println!(
        "{} {} '{}' created (ID: {})",
        "✓".green().bold(),
        resource_type.green(),
        name.green().bold(),
        id.dimmed()
    );
}

pub fn print_deleted(resource_type: &str, id: &str) {
    println!(
        "{} {} '{}' deleted",
        "✓".green().bold(),
        resource_type.green(),
        id.green().bold()
    );
}

/// Info goes to stderr so piped YAML stays clean
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
}

/// Format an RFC 3339 timestamp as relative time (e.g., "5m ago", "2h ago").
/// Unparseable input is returned unchanged.
pub fn format_relative_time(timestamp: &str) -> String {
    let Ok(then) = chrono::DateTime::parse_from_rfc3339(timestamp) else {
        return timestamp.to_string();
    };
    relative_to(then.timestamp(), chrono::Utc::now().timestamp())
}

fn relative_to(then: i64, now: i64) -> String {
    let diff = now - then;

    if diff < 0 {
        "just now".to_string()
    } else if diff < 60 {
        format!("{}s ago", diff)
    } else if diff < 3600 {
        format!("{}m ago", diff / 60)
    } else if diff < 86400 {
        format!("{}h ago", diff / 3600)
    } else {
        format!("{}d ago", diff / 86400)
    }
}

/// Truncate a string to `max_len` characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("yml"), OutputFormat::Yaml);
        assert_eq!(OutputFormat::parse("wide"), OutputFormat::Table);
    }

    #[test]
    fn test_relative_time() {
        assert_eq!(relative_to(1_000, 1_030), "30s ago");
        assert_eq!(relative_to(0, 7_200), "2h ago");
        assert_eq!(relative_to(0, 3 * 86_400), "3d ago");
        assert_eq!(format_relative_time("yesterday"), "yesterday");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("storefront", 20), "storefront");
        assert_eq!(truncate("storefront-backend", 10), "storefr...");
        assert_eq!(truncate("ñandú", 2), "ña");
    }
}
