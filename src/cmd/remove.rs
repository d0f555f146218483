use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::output::OutputFormat;
use crate::store::MemoryStore;

#[derive(Args)]
pub struct RemoveArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Serialize)]
struct RemoveOutput {
    agent: String,
    path: String,
    removed: bool,
}

pub fn run(args: RemoveArgs, store: &MemoryStore) -> Result<(), String> {
    let format = args.format.resolve();

    let path = store.remove(&args.agent)?;
    let path_str = path.to_string_lossy().to_string();

    match format {
        OutputFormat::Pretty | OutputFormat::Plain => {
            println!("Removed: {}", path_str);
        }
        OutputFormat::Json => {
            let output = RemoveOutput {
                agent: args.agent.clone(),
                path: path_str,
                removed: true,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("JSON serialization failed: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let output = RemoveOutput {
                agent: args.agent.clone(),
                path: path_str,
                removed: true,
            };
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("YAML serialization failed: {}", e))?;
            print!("{}", yaml);
        }
    }

    Ok(())
}
