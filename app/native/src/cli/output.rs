//! CLI output formatting utilities.

use std::path::Path;

use colored::Colorize;

use crate::config::Settings;

/// Width of the key column in [`print_settings`].
const KEY_WIDTH: usize = 14;

/// Prints the settings as aligned `key  value` lines.
pub fn print_settings(settings: &Settings, path: &Path) {
    let directory = if settings.directory.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        format!("{} {}", settings.directory, format_bool(settings.has_valid_directory()))
    };

    print_row("file", &path.display().to_string().dimmed().to_string());
    print_row("directory", &directory);
    print_row("interval", &format_interval(settings.interval));
    print_row("order", settings.order.label());
    print_row("display_mode", settings.display_mode.label());
}

fn print_row(key: &str, value: &str) {
    println!("{}  {value}", format!("{key:<KEY_WIDTH$}").cyan());
}

/// Prints a JSON value with 2-space indentation.
pub fn print_json(value: &serde_json::Value) {
    let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
    println!("{json}");
}

/// Prints a success line prefixed with a green check mark.
pub fn print_success(message: &str) {
    println!("{} {message}", "✓".green());
}

/// Prints a warning line to stderr.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}

/// Formats an interval in seconds, with a human-readable hint for longer ones.
#[must_use]
pub fn format_interval(secs: u64) -> String {
    let hint = match secs {
        s if s >= 3_600 && s % 3_600 == 0 => Some(format!("{}h", s / 3_600)),
        s if s >= 60 && s % 60 == 0 => Some(format!("{}m", s / 60)),
        _ => None,
    };

    match hint {
        Some(hint) => format!("{secs}s ({hint})"),
        None => format!("{secs}s"),
    }
}

/// Formats a boolean as a colored string.
#[must_use]
pub fn format_bool(value: bool) -> String {
    if value {
        "✓".green().to_string()
    } else {
        "✗".red().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_interval_seconds() {
        assert_eq!(format_interval(10), "10s");
        assert_eq!(format_interval(90), "90s");
    }

    #[test]
    fn test_format_interval_minutes() {
        assert_eq!(format_interval(60), "60s (1m)");
        assert_eq!(format_interval(600), "600s (10m)");
    }

    #[test]
    fn test_format_interval_hours() {
        assert_eq!(format_interval(3_600), "3600s (1h)");
        assert_eq!(format_interval(86_400), "86400s (24h)");
    }

    #[test]
    fn test_format_bool_true() {
        assert!(format_bool(true).contains('✓'));
    }

    #[test]
    fn test_format_bool_false() {
        assert!(format_bool(false).contains('✗'));
    }
}
