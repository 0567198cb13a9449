//! Display Library
//!
//! Consistent terminal output: boxed summaries, bar gauges and status badges.
//! Every plain-terminal view goes through these helpers.

use crate::ui_colors::RiskTone;
use owo_colors::OwoColorize;

/// Status level for messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    /// Needs attention (elevated risk)
    Critical,
    /// Informational message
    Info,
    /// All clear (low risk)
    Success,
}

impl StatusLevel {
    /// Get the icon for this status level
    pub fn icon(&self, use_color: bool) -> String {
        if use_color {
            match self {
                StatusLevel::Critical => "⚠️ ".red().to_string(),
                StatusLevel::Info => "💡".blue().to_string(),
                StatusLevel::Success => "✅".green().to_string(),
            }
        } else {
            match self {
                StatusLevel::Critical => "[!]".to_string(),
                StatusLevel::Info => "[i]".to_string(),
                StatusLevel::Success => "[ok]".to_string(),
            }
        }
    }
}

/// Icon + bold upper-case text, e.g. "✅ LOW RISK"
pub fn badge(level: StatusLevel, text: &str, use_color: bool) -> String {
    let text = text.to_uppercase();
    if use_color {
        let styled = match level {
            StatusLevel::Critical => text.red().bold().to_string(),
            StatusLevel::Info => text.blue().bold().to_string(),
            StatusLevel::Success => text.green().bold().to_string(),
        };
        format!("{} {}", level.icon(true), styled)
    } else {
        format!("{} {}", level.icon(false), text)
    }
}

/// Display a summary box
pub fn summary_box(title: &str, items: &[(&str, &str)], use_color: bool) -> String {
    let mut output = String::new();

    output.push_str("┌────────────────────────────────────────────────────────┐\n");

    let formatted_title = if use_color {
        format!("│ {:<54} │\n", title.bold().to_string())
    } else {
        format!("│ {:<54} │\n", title)
    };
    output.push_str(&formatted_title);

    output.push_str("├────────────────────────────────────────────────────────┤\n");

    for (key, value) in items {
        output.push_str(&format!("│ {:<22} {:<31} │\n", key, value));
    }

    output.push_str("└────────────────────────────────────────────────────────┘\n");

    output
}

/// Horizontal bar filled to `fraction` (clamped to [0, 1])
pub fn gauge(fraction: f64, width: usize, tone: RiskTone, use_color: bool) -> String {
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let filled = ((width as f64) * fraction).round() as usize;
    let empty = width - filled.min(width);

    if use_color {
        let (r, g, b) = tone.color();
        format!(
            "[{}{}]",
            "█".repeat(filled).truecolor(r, g, b),
            "░".repeat(empty).dimmed()
        )
    } else {
        format!("[{}{}]", "#".repeat(filled), ".".repeat(empty))
    }
}

/// Check if color output should be used
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    atty::is(atty::Stream::Stdout)
}
