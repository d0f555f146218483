use clap::Args;
use clap_complete::engine::ArgValueCompleter;
use serde::Serialize;

use crate::args::FormatArgs;
use crate::output::OutputFormat;
use crate::store::MemoryStore;

#[derive(Args)]
pub struct PathArgs {
    /// Agent identifier
    #[arg(add = ArgValueCompleter::new(crate::store::complete_agent_ids))]
    agent: String,

    #[command(flatten)]
    format: FormatArgs,
}

#[derive(Serialize)]
struct PathOutput {
    agent: String,
    path: String,
    exists: bool,
}

pub fn run(args: PathArgs, store: &MemoryStore) -> Result<(), String> {
    let format = args.format.resolve();

    // The path resolves whether or not a document exists yet, so callers
    // can find where an upsert would land.
    let path = store.path_for(&args.agent)?;
    let exists = path.exists();

    match format {
        OutputFormat::Pretty | OutputFormat::Plain => {
            println!("{}", path.display());
        }
        OutputFormat::Json => {
            let output = PathOutput {
                agent: args.agent.clone(),
                path: path.to_string_lossy().to_string(),
                exists,
            };
            let json = serde_json::to_string_pretty(&output)
                .map_err(|e| format!("JSON serialization failed: {}", e))?;
            println!("{}", json);
        }
        OutputFormat::Yaml => {
            let output = PathOutput {
                agent: args.agent.clone(),
                path: path.to_string_lossy().to_string(),
                exists,
            };
            let yaml = serde_yaml::to_string(&output)
                .map_err(|e| format!("YAML serialization failed: {}", e))?;
            print!("{}", yaml);
        }
    }

    Ok(())
}
