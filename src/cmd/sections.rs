use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::args::FormatArgs;
use crate::config::{Config, is_quiet};
use crate::output::{self, OutputFormat};
use crate::section::Section;
use crate::store::MemoryStore;

#[derive(Args)]
pub struct SectionsArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    #[command(flatten)]
    format: FormatArgs,
}

/// Per-section summary for structured output
#[derive(Serialize)]
struct SectionSummary {
    title: String,
    level: u8,
    line_count: usize,
}

impl From<&Section> for SectionSummary {
    fn from(s: &Section) -> Self {
        Self {
            title: s.title.clone(),
            level: s.level,
            line_count: s.line_count(),
        }
    }
}

#[derive(Serialize)]
struct SectionsOutput {
    agent: String,
    path: String,
    sections: Vec<SectionSummary>,
}

/// Row data for tabled output
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "LEVEL")]
    level: String,
    #[tabled(rename = "LINES")]
    lines: usize,
    #[tabled(rename = "TITLE")]
    title: String,
}

pub fn run(args: SectionsArgs, store: &MemoryStore, config: &Config) -> Result<(), String> {
    let format = args.format.resolve();

    let sections = store
        .sections(&args.agent)?
        .ok_or_else(|| store.no_document_hint(&args.agent))?;
    let path = store.path_for(&args.agent)?;

    match format {
        OutputFormat::Pretty => {
            println!(
                "{} ({} sections)",
                output::style_agent(&args.agent),
                sections.len()
            );

            if sections.is_empty() {
                if !is_quiet(config) {
                    println!(
                        "{}",
                        "Hint: the document has no headers yet; upsert a section to add one"
                            .dimmed()
                    );
                }
                return Ok(());
            }

            let title_max = output::terminal_width().saturating_sub(20).max(20);
            let rows: Vec<TableRow> = sections
                .iter()
                .map(|s| TableRow {
                    level: output::style_level(s.level).to_string(),
                    lines: s.line_count(),
                    title: output::truncate_back(&s.title, title_max),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Plain => {
            println!("Agent: {}", args.agent);
            println!("Path: {}", path.display());
            println!();
            println!("LEVEL | LINES | TITLE");
            for s in &sections {
                println!("{} | {} | {}", s.level, s.line_count(), s.title);
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = SectionsOutput {
                agent: args.agent.clone(),
                path: path.to_string_lossy().to_string(),
                sections: sections.iter().map(SectionSummary::from).collect(),
            };
            print_structured(&out, format)?;
        }
    }

    Ok(())
}

fn print_structured(out: &SectionsOutput, format: OutputFormat) -> Result<(), String> {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(out)
                    .map_err(|e| format!("JSON serialization failed: {}", e))?
            );
        }
        OutputFormat::Yaml => {
            print!(
                "{}",
                serde_yaml::to_string(out)
                    .map_err(|e| format!("YAML serialization failed: {}", e))?
            );
        }
        _ => unreachable!(),
    }
    Ok(())
}
