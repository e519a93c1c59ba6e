//! Pure formatting functions for UI output.
//!
//! Functions here build styled strings; printing happens in the parent
//! module.

use console::style;

use crate::report::Level;

/// Render a report line with a colored status marker.
pub fn format_line(level: Level, message: &str) -> String {
    match level {
        Level::Success => format!("{} {}", style("✓").green(), message),
        Level::Info => format!("{} {}", style("→").cyan(), message),
        Level::Warning => format!("{} {}", style("⚠ WARNING:").yellow(), message),
        Level::Error => format!("{} {}", style("ERROR:").red().bold(), message),
        Level::Preview => format!("{} {}", style("[dry-run]").magenta(), message),
    }
}

/// Indent every line of a multi-line block for display under a report line.
pub fn indent_block(block: &str) -> String {
    block
        .lines()
        .map(|line| format!("    {}", line))
        .collect::<Vec<_>>()
        .join("\n")
}
