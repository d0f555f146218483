use std::fs;

use chrono::{DateTime, Local, Utc};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::args::FormatArgs;
use crate::config::{Config, is_quiet};
use crate::output::{self, OutputFormat};
use crate::section;
use crate::store::MemoryStore;

#[derive(Args)]
pub struct AgentsArgs {
    #[command(flatten)]
    format: FormatArgs,
}

struct AgentInfo {
    agent: String,
    path: String,
    sections: usize,
    modified_dt: Option<DateTime<Local>>,
}

impl AgentInfo {
    fn modified_short(&self) -> String {
        self.modified_dt
            .map(output::format_relative_short)
            .unwrap_or_else(|| "?".to_string())
    }

    fn modified_plain(&self) -> String {
        self.modified_dt
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "?".to_string())
    }

    fn modified_iso(&self) -> String {
        self.modified_dt
            .map(|dt| dt.with_timezone(&Utc).to_rfc3339())
            .unwrap_or_default()
    }

    fn modified_ts(&self) -> i64 {
        self.modified_dt.map(|dt| dt.timestamp()).unwrap_or(0)
    }
}

/// Row data for tabled output
#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "AGENT")]
    agent: String,
    #[tabled(rename = "SECTIONS")]
    sections: usize,
    #[tabled(rename = "MOD")]
    modified: String,
    #[tabled(rename = "PATH")]
    path: String,
}

#[derive(Serialize)]
struct AgentInfoJson {
    agent: String,
    path: String,
    sections: usize,
    modified: String,
}

#[derive(Serialize)]
struct AgentsOutput {
    root: String,
    agents: Vec<AgentInfoJson>,
}

pub fn run(args: AgentsArgs, store: &MemoryStore, config: &Config) -> Result<(), String> {
    let format = args.format.resolve();

    let mut results: Vec<AgentInfo> = Vec::new();
    for entry in store.list_agents()? {
        // Count sections straight off the entry path; hand-placed file
        // names are not forced through identifier sanitization.
        let sections = fs::read_to_string(&entry.path)
            .map(|text| section::scan(&text).len())
            .unwrap_or(0);

        results.push(AgentInfo {
            agent: entry.name,
            path: entry.path.to_string_lossy().to_string(),
            sections,
            modified_dt: entry.modified.map(|t| t.into()),
        });
    }

    // Most recently touched memory first
    results.sort_by_key(|a| std::cmp::Reverse(a.modified_ts()));

    match format {
        OutputFormat::Pretty => {
            println!(
                "{} ({} agents)",
                store.root().display().to_string().bold(),
                results.len()
            );

            if results.is_empty() {
                if !is_quiet(config) {
                    println!(
                        "{}",
                        "Hint: run 'recall upsert <agent> <title>' to create the first memory"
                            .dimmed()
                    );
                }
                return Ok(());
            }
            println!();

            let rows: Vec<TableRow> = results
                .iter()
                .map(|a| TableRow {
                    agent: output::style_agent(&a.agent).to_string(),
                    sections: a.sections,
                    modified: a.modified_short(),
                    path: output::style_path(&a.path).to_string(),
                })
                .collect();

            let mut table = Table::new(rows);
            table.with(Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Plain => {
            println!("Root: {}", store.root().display());
            println!("Showing {} agents", results.len());
            println!();
            println!("AGENT | SECTIONS | MODIFIED | PATH");
            for a in &results {
                println!(
                    "{} | {} | {} | {}",
                    a.agent,
                    a.sections,
                    a.modified_plain(),
                    a.path
                );
            }
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let out = AgentsOutput {
                root: store.root().to_string_lossy().to_string(),
                agents: results
                    .iter()
                    .map(|a| AgentInfoJson {
                        agent: a.agent.clone(),
                        path: a.path.clone(),
                        sections: a.sections,
                        modified: a.modified_iso(),
                    })
                    .collect(),
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
