//! Configuration system for the recall CLI.
//!
//! Configuration is loaded from multiple sources with the following precedence:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (RECALL_*)
//! 3. User global (~/.config/recall/config.yaml)
//! 4. Built-in defaults (lowest priority)
//!
//! This module provides:
//! - `Config` struct with all settings
//! - `EnvVar` registry for documentation
//! - Helper functions for env var parsing
//! - Config loading and merging

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration for the recall CLI.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Storage settings
    pub storage: StorageConfig,
    /// Default values for operations
    pub defaults: DefaultsConfig,
    /// Behavior settings
    pub behavior: BehaviorConfig,
}

/// Storage settings.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StorageConfig {
    /// Memory root directory (null = platform data dir, e.g.
    /// ~/.local/share/recall)
    pub root: Option<String>,
}

/// Default values for operations.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DefaultsConfig {
    /// Default header level for upserted sections (1-6)
    pub level: u8,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self { level: 2 }
    }
}

/// Behavior defaults.
#[derive(Debug, Default, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Suppress hints
    pub quiet: bool,
}

// ============================================================================
// Config Source Tracking
// ============================================================================

/// Source of a configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default
    Default,
    /// User global config (~/.config/recall/config.yaml)
    UserGlobal,
    /// Environment variable
    EnvVar(String),
    /// CLI flag
    CliFlag,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::UserGlobal => write!(f, "~/.config/recall/config.yaml"),
            ConfigSource::EnvVar(name) => write!(f, "${}", name),
            ConfigSource::CliFlag => write!(f, "CLI flag"),
        }
    }
}

// ============================================================================
// Environment Variable Registry
// ============================================================================

/// Environment variable definition for documentation.
pub struct EnvVar {
    /// Variable name (e.g., "RECALL_ROOT")
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
    /// Default value or behavior
    pub default: &'static str,
    /// Config path this maps to (e.g., "storage.root")
    pub config_path: &'static str,
    /// Valid values (if enumerable)
    pub values: Option<&'static str>,
}

/// Registry of all supported environment variables.
pub const ENV_VARS: &[EnvVar] = &[
    EnvVar {
        name: "NO_COLOR",
        description: "Disable colored output (standard)",
        default: "unset",
        config_path: "display.color",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "FORCE_COLOR",
        description: "Force colored output even when not a TTY",
        default: "unset",
        config_path: "display.color",
        values: Some("any non-empty value"),
    },
    EnvVar {
        name: "RECALL_FORMAT",
        description: "Default output format",
        default: "pretty (auto-detects TTY)",
        config_path: "display.format",
        values: Some("pretty, plain, json, yaml"),
    },
    EnvVar {
        name: "RECALL_ROOT",
        description: "Override the memory root directory",
        default: "platform data dir (e.g. ~/.local/share/recall)",
        config_path: "storage.root",
        values: Some("path"),
    },
    EnvVar {
        name: "RECALL_DEFAULT_LEVEL",
        description: "Default header level for upserted sections",
        default: "2",
        config_path: "defaults.level",
        values: Some("1-6"),
    },
    EnvVar {
        name: "RECALL_QUIET",
        description: "Suppress hint messages",
        default: "false",
        config_path: "behavior.quiet",
        values: Some("1, true, yes"),
    },
];

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Parse a boolean environment variable.
///
/// Returns `Some(true)` if the variable is set to a truthy value (1, true, yes),
/// `Some(false)` if set to a falsy value (0, false, no),
/// and `None` if unset or empty.
pub fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|v| {
        if v.is_empty() {
            return None;
        }
        let lower = v.to_lowercase();
        match lower.as_str() {
            "1" | "true" | "yes" => Some(true),
            "0" | "false" | "no" => Some(false),
            _ => None,
        }
    })
}

/// Parse a string environment variable.
///
/// Returns `Some(value)` if set and non-empty, `None` otherwise.
pub fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Parse a u8 environment variable.
///
/// Returns `Some(value)` if set and parseable, `None` otherwise.
pub fn env_u8(name: &str) -> Option<u8> {
    env_string(name).and_then(|v| v.parse().ok())
}

// ============================================================================
// Config Loading
// ============================================================================

/// Load configuration from all sources.
///
/// Resolution order (later overrides earlier):
/// 1. Built-in defaults
/// 2. User global (~/.config/recall/config.yaml)
///
/// Does not apply CLI flags (those are handled by args resolution).
/// Does not apply ENV vars (those are checked at point of use).
pub fn load_config() -> LoadedConfig {
    let mut config = Config::default();
    let mut sources = vec![ConfigSource::Default];

    if let Some(user_config_path) = user_config_path() {
        if let Some(user_config) = load_config_file(&user_config_path) {
            merge(&mut config, &user_config);
            sources.push(ConfigSource::UserGlobal);
        }
    }

    LoadedConfig { config, sources }
}

/// Result of loading configuration with source tracking.
#[derive(Debug)]
pub struct LoadedConfig {
    /// The merged configuration
    pub config: Config,
    /// Sources that contributed to this config (in order of application)
    pub sources: Vec<ConfigSource>,
}

/// Get the user config file path (~/.config/recall/config.yaml).
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("recall").join("config.yaml"))
}

/// Load a config file, returning None if it doesn't exist or can't be parsed.
pub fn load_config_file(path: &Path) -> Option<Config> {
    let content = fs::read_to_string(path).ok()?;
    serde_yaml::from_str(&content).ok()
}

/// Merge overlay config into base config.
///
/// Non-default values in overlay override values in base.
pub fn merge(base: &mut Config, overlay: &Config) {
    if overlay.storage.root.is_some() {
        base.storage.root = overlay.storage.root.clone();
    }

    let default_defaults = DefaultsConfig::default();
    if overlay.defaults.level != default_defaults.level {
        base.defaults.level = overlay.defaults.level;
    }

    let default_behavior = BehaviorConfig::default();
    if overlay.behavior.quiet != default_behavior.quiet {
        base.behavior.quiet = overlay.behavior.quiet;
    }
}

/// Generate JSON schema for the config.
pub fn json_schema() -> String {
    let schema = schemars::schema_for!(Config);
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
}

/// Resolve the default header level: $RECALL_DEFAULT_LEVEL, then config.
///
/// Out-of-range values are rejected, not clamped; a header the scanner
/// would re-parse at a different level must never be written.
pub fn default_level(config: &Config) -> Result<u8, String> {
    let level = env_u8("RECALL_DEFAULT_LEVEL").unwrap_or(config.defaults.level);
    if !(1..=6).contains(&level) {
        return Err(format!(
            "invalid default header level {} (must be 1-6); check RECALL_DEFAULT_LEVEL or defaults.level",
            level
        ));
    }
    Ok(level)
}

/// Check if quiet mode is enabled (suppress hints).
///
/// Checks both config.behavior.quiet and RECALL_QUIET env var.
pub fn is_quiet(config: &Config) -> bool {
    config.behavior.quiet || env_bool("RECALL_QUIET").unwrap_or(false)
}

/// Generate a template config file with comments.
pub fn template_config() -> String {
    r#"# recall configuration
# Place in ~/.config/recall/config.yaml

# Storage settings
# storage:
#   root: null          # null = platform data dir (~/.local/share/recall)

# Default values
# defaults:
#   level: 2            # header level for upserted sections (1-6)

# Behavior settings
# behavior:
#   quiet: false        # suppress hint messages
"#
    .to_string()
}

// ============================================================================
// Tests
// ============================================================================
