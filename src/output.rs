//! Output formatting utilities with TTY auto-detection and semantic styling.

use std::io::IsTerminal;

use chrono::{DateTime, Local};
use clap::ValueEnum;
use colored::{ColoredString, Colorize};
use termimad::MadSkin;

/// Output format for commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-optimized: colors, rendered markdown, relative dates
    #[default]
    Pretty,
    /// LLM-optimized: no colors, pipe-delimited, raw markdown
    Plain,
    /// Machine-readable JSON with ISO 8601 timestamps
    Json,
    /// Machine-readable YAML with ISO 8601 timestamps
    Yaml,
}

impl OutputFormat {
    /// Resolve the output format, applying TTY auto-detection.
    ///
    /// If format is Pretty but stdout is not a TTY, returns Plain.
    pub fn resolve(self) -> Self {
        match self {
            OutputFormat::Pretty if !std::io::stdout().is_terminal() => OutputFormat::Plain,
            other => other,
        }
    }

    /// Parse an environment override ($RECALL_FORMAT). Unknown values are
    /// ignored rather than fatal.
    pub fn from_env_str(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "pretty" => Some(OutputFormat::Pretty),
            "plain" => Some(OutputFormat::Plain),
            "json" => Some(OutputFormat::Json),
            "yaml" => Some(OutputFormat::Yaml),
            _ => None,
        }
    }
}

// ============================================================================
// Semantic Styling - Centralized color/style decisions
// ============================================================================

/// Section titles carry the emphasis; everything around them stays quiet.
pub fn style_title(title: &str) -> ColoredString {
    title.cyan().bold()
}

/// Header level markers ("##") - always dimmed.
pub fn style_level(level: u8) -> ColoredString {
    "#".repeat(level as usize).dimmed()
}

/// Agent identifiers - bold, they are the primary key of every command.
pub fn style_agent(agent: &str) -> ColoredString {
    agent.bold()
}

/// Paths - always dimmed.
pub fn style_path(path: &str) -> ColoredString {
    path.dimmed()
}

// ============================================================================
// Markdown rendering
// ============================================================================

/// Render markdown for terminal display.
pub fn render_markdown(text: &str) -> String {
    let skin = MadSkin::default();
    let mut buf = Vec::new();
    skin.write_text_on(&mut buf, text).ok();
    String::from_utf8_lossy(&buf).trim_end().to_string()
}

// ============================================================================
// Terminal utilities
// ============================================================================

/// Get terminal width, defaulting to 80 if unavailable.
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

// ============================================================================
// Date formatting
// ============================================================================

/// Format a datetime as short relative time (e.g., "5m", "3h", "2d", "1w", "2mo", "1y").
pub fn format_relative_short(dt: DateTime<Local>) -> String {
    let now = Local::now();
    let duration = now.signed_duration_since(dt);

    let seconds = duration.num_seconds().abs();
    let minutes = duration.num_minutes().abs();
    let hours = duration.num_hours().abs();
    let days = duration.num_days().abs();

    if seconds < 60 {
        "now".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else if hours < 24 {
        format!("{}h", hours)
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days < 365 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", days / 365)
    }
}

// ============================================================================
// Text utilities
// ============================================================================

/// Truncate a string from the back, showing "prefix…".
pub fn truncate_back(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else if max_chars <= 1 {
        "…".to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 1).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_str() {
        let cases = vec![
            ("pretty", Some(OutputFormat::Pretty)),
            ("JSON", Some(OutputFormat::Json)),
            ("yaml", Some(OutputFormat::Yaml)),
            ("plain", Some(OutputFormat::Plain)),
            ("table", None),
            ("", None),
        ];

        for (value, want) in cases {
            let got = OutputFormat::from_env_str(value);
            assert_eq!(got, want, "from_env_str({:?}) = {:?}, want {:?}", value, got, want);
        }
    }

    #[test]
    fn test_truncate_back() {
        let cases = vec![
            ("short", 10, "short"),
            ("exactly-ten", 11, "exactly-ten"),
            ("a longer title here", 10, "a longer …"),
            ("x", 1, "x"),
            ("xy", 1, "…"),
        ];

        for (s, max, want) in cases {
            let got = truncate_back(s, max);
            assert_eq!(got, want, "truncate_back({:?}, {})", s, max);
        }
    }
}
