//! Terminal presentation for the disambiguation prompt and status lines.
//!
//! The candidate lines are a protocol (`<index>:<title>`, one per line, in
//! result order); styling wraps the same text and only applies on TTYs.

use is_terminal::IsTerminal;
use owo_colors::OwoColorize;

/// Whether stdout supports styled output.
pub fn use_color() -> bool {
    std::io::stdout().is_terminal()
}

/// Protocol line for one candidate: `<index>:<title>`.
pub fn candidate_line(index: usize, title: &str, color: bool) -> String {
    if color {
        format!("{}:{}", index.cyan().bold(), title)
    } else {
        format!("{}:{}", index, title)
    }
}

/// Status line for a confirmed match.
pub fn confirmed_line(title: &str, color: bool) -> String {
    if color {
        format!("{} matched {}", "✓".green().bold(), title.blue().bold())
    } else {
        format!("✓ matched {}", title)
    }
}

/// Status line for a persisted record.
pub fn persisted_line(path: &str, color: bool) -> String {
    if color {
        format!("{} wrote {}", "✓".green().bold(), path.blue())
    } else {
        format!("✓ wrote {}", path)
    }
}
