use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::output::{self, OutputFormat};
use crate::store::{MemoryStore, SectionLookup};

#[derive(Args)]
pub struct GetArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    /// Section title (matched case-insensitively)
    title: String,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Serialize)]
struct GetOutput {
    agent: String,
    path: String,
    title: String,
    level: u8,
    content: String,
    start_line: usize,
    end_line: usize,
}

pub fn run(args: GetArgs, store: &MemoryStore) -> Result<(), String> {
    let format = args.format.resolve();

    let section = match store.lookup(&args.agent, &args.title)? {
        SectionLookup::Found(section) => section,
        SectionLookup::NotFound { available } => {
            return Err(not_found_message(&args.agent, &args.title, &available));
        }
        SectionLookup::NoDocument { hint } => return Err(hint),
    };

    match format {
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                output::style_level(section.level),
                output::style_title(&section.title)
            );
            if !section.content.is_empty() {
                println!();
                println!("{}", output::render_markdown(&section.content));
            }
        }
        OutputFormat::Plain => {
            // Plain: content only, scriptable
            println!("{}", section.content);
        }
        OutputFormat::Json | OutputFormat::Yaml => {
            let path = store.path_for(&args.agent)?;
            let out = GetOutput {
                agent: args.agent.clone(),
                path: path.to_string_lossy().to_string(),
                title: section.title.clone(),
                level: section.level,
                content: section.content.clone(),
                start_line: section.start_line,
                end_line: section.end_line,
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

/// A missing title always reports what is there instead.
fn not_found_message(agent: &str, title: &str, available: &[String]) -> String {
    if available.is_empty() {
        format!(
            "section '{}' not found in memory for '{}' (the document has no sections)",
            title, agent
        )
    } else {
        format!(
            "section '{}' not found in memory for '{}'; available sections: {}",
            title,
            agent,
            available.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_enumerates_titles() {
        let msg = not_found_message("claude", "Notes", &["Skills".into(), "Log".into()]);
        assert!(msg.contains("Skills, Log"), "titles listed: {}", msg);

        let msg = not_found_message("claude", "Notes", &[]);
        assert!(msg.contains("no sections"), "empty case explained: {}", msg);
    }
}
