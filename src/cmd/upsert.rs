use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::config::{self, Config};
use crate::input;
use crate::output::OutputFormat;
use crate::store::{MemoryStore, UpsertAction};

#[derive(Args)]
pub struct UpsertArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    /// Section title (replaces the first case-insensitive match, else appends)
    title: String,

    /// Section content (reads stdin when omitted)
    content: Option<String>,

    /// Header level for the section
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=6))]
    level: Option<u8>,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Serialize)]
struct SectionRef {
    title: String,
    level: u8,
}

#[derive(Serialize)]
struct UpsertOutput {
    success: bool,
    path: String,
    section: SectionRef,
    action: UpsertAction,
}

pub fn run(args: UpsertArgs, store: &MemoryStore, config: &Config) -> Result<(), String> {
    let format = args.format.resolve();

    let content = match args.content {
        Some(content) => content,
        None => {
            let piped = input::read_stdin(true);
            if piped.is_empty() {
                return Err("no content provided (pass an argument or pipe stdin)".to_string());
            }
            piped
        }
    };

    // clap already bounds --level; the config/env fallback is validated here
    let level = match args.level {
        Some(level) => level,
        None => config::default_level(config)?,
    };

    let outcome = store.upsert(&args.agent, &args.title, &content, level)?;

    match format {
        OutputFormat::Pretty | OutputFormat::Plain => {
            let verb = match outcome.action {
                UpsertAction::Created => "Created",
                UpsertAction::Updated => "Updated",
            };
            println!(
                "{} section '{}' (level {}) in {}",
                verb,
                outcome.title,
                outcome.level,
                outcome.path.display()
            );
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = UpsertOutput {
                success: true,
                path: outcome.path.to_string_lossy().to_string(),
                section: SectionRef {
                    title: outcome.title,
                    level: outcome.level,
                },
                action: outcome.action,
            };
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    serde_json::to_string_pretty(&out)
                        .map_err(|e| format!("JSON serialization failed: {}", e))?
                ),
                OutputFormat::Yaml => print!(
                    "{}",
                    serde_yaml::to_string(&out)
                        .map_err(|e| format!("YAML serialization failed: {}", e))?
                ),
                _ => unreachable!(),
            }
        }
    }

    Ok(())
}
