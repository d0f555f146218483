//! Shared CLI argument structs for consistent flag definitions across commands.

use clap::Args;

use crate::config::env_string;
use crate::output::OutputFormat;

/// Common output format flags.
///
/// Provides consistent --format/-f and --json flags across commands.
/// Use `resolve()` to get the effective format with TTY auto-detection.
#[derive(Args, Clone, Debug, Default)]
pub struct FormatArgs {
    /// Output format (auto-detects TTY for pretty vs plain)
    #[arg(short = 'f', long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Output as JSON (shorthand for --format=json)
    #[arg(long, conflicts_with = "format", global = true)]
    pub json: bool,
}

impl FormatArgs {
    /// Resolve the effective output format.
    ///
    /// Precedence: --json, --format, $RECALL_FORMAT, then pretty with TTY
    /// auto-detection.
    pub fn resolve(&self) -> OutputFormat {
        if self.json {
            return OutputFormat::Json;
        }
        if let Some(format) = self.format {
            return format.resolve();
        }
        if let Some(format) = env_string("RECALL_FORMAT").and_then(|v| OutputFormat::from_env_str(&v))
        {
            return format.resolve();
        }
        OutputFormat::Pretty.resolve()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_shorthand_wins() {
        let args = FormatArgs {
            format: None,
            json: true,
        };
        assert_eq!(args.resolve(), OutputFormat::Json);
    }

    #[test]
    fn test_explicit_format_kept_for_machine_formats() {
        // Json/Yaml are never rewritten by TTY detection.
        let args = FormatArgs {
            format: Some(OutputFormat::Yaml),
            json: false,
        };
        assert_eq!(args.resolve(), OutputFormat::Yaml);
    }
}
