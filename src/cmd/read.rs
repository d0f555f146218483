use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::output::{self, OutputFormat};
use crate::section;
use crate::store::MemoryStore;

#[derive(Args)]
pub struct ReadArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    #[command(flatten)]
    format: FormatArgs,
}

/// Structured output data for JSON/YAML
#[derive(Serialize)]
struct DocumentOutput {
    agent: String,
    path: String,
    raw: String,
    sections: Vec<SectionSummary>,
}

#[derive(Serialize)]
struct SectionSummary {
    title: String,
    level: u8,
    line_count: usize,
}

pub fn run(args: ReadArgs, store: &MemoryStore) -> Result<(), String> {
    let format = args.format.resolve();

    let text = store
        .load(&args.agent)?
        .ok_or_else(|| store.no_document_hint(&args.agent))?;
    let path = store.path_for(&args.agent)?;

    match format {
        OutputFormat::Pretty => {
            println!(
                "{}  {}",
                output::style_agent(&args.agent),
                output::style_path(&path.to_string_lossy())
            );
            println!();
            println!("{}", output::render_markdown(&text));
        }
        OutputFormat::Plain => {
            // Plain: raw markdown content
            print!("{}", text);
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let sections = section::scan(&text)
                .iter()
                .map(|s| SectionSummary {
                    title: s.title.clone(),
                    level: s.level,
                    line_count: s.line_count(),
                })
                .collect();

            let out = DocumentOutput {
                agent: args.agent.clone(),
                path: path.to_string_lossy().to_string(),
                raw: text,
                sections,
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
