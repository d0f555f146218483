use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::env::CompleteEnv;
use clap_complete::{Shell, generate};

mod args;
mod cmd;
mod config;
mod input;
mod output;
mod patch;
mod section;
mod store;

use store::MemoryStore;

#[derive(Parser)]
#[command(name = "recall")]
#[command(version = env!("RECALL_VERSION"))]
#[command(about = "Agent memory management for LLM workflows")]
#[command(
    long_about = "recall - Persistent section-structured memory for LLM agents.\n\nEach agent owns one markdown document under the memory root. Sections\nare addressed by title and replaced or appended in place, so agents can\nre-assert what they know without corrupting the rest of the document."
)]
struct Cli {
    /// Memory root directory (overrides $RECALL_ROOT and config)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List agents with memory documents
    #[command(alias = "ls")]
    Agents(cmd::agents::AgentsArgs),

    /// List a document's sections
    Sections(cmd::sections::SectionsArgs),

    /// Read one section by title
    #[command(alias = "show")]
    Get(cmd::get::GetArgs),

    /// Create or replace a section
    #[command(alias = "set")]
    Upsert(cmd::upsert::UpsertArgs),

    /// Read a whole memory document
    #[command(alias = "cat")]
    Read(cmd::read::ReadArgs),

    /// Print a document's storage path
    Path(cmd::path::PathArgs),

    /// Remove a memory document
    #[command(alias = "rm")]
    Remove(cmd::remove::RemoveArgs),

    /// Generate shell completion script
    Completion(CompletionArgs),

    /// Configuration introspection
    Config(cmd::config_cmd::ConfigArgs),
}

#[derive(clap::Args)]
struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Clone, ValueEnum)]
enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

fn main() {
    // Handle dynamic shell completions
    CompleteEnv::with_factory(Cli::command).complete();

    // Use try_parse to catch errors and normalize exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Print the error (includes usage for missing args)
            let _ = e.print();
            // Exit with 0 for help/version, 1 for actual errors
            let exit_code = if e.kind() == clap::error::ErrorKind::DisplayHelp
                || e.kind() == clap::error::ErrorKind::DisplayVersion
            {
                0
            } else {
                1
            };
            process::exit(exit_code);
        }
    };

    // Handle completion before store setup (doesn't need a root)
    if let Commands::Completion(args) = &cli.command {
        let shell = match args.shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::Powershell => Shell::PowerShell,
        };
        generate(shell, &mut Cli::command(), "recall", &mut io::stdout());
        return;
    }

    // Load config and resolve the memory root
    let loaded_config = config::load_config();
    let store = MemoryStore::new(store::resolve_root(cli.root, &loaded_config.config));

    let result = match cli.command {
        Commands::Agents(args) => cmd::agents::run(args, &store, &loaded_config.config),
        Commands::Sections(args) => cmd::sections::run(args, &store, &loaded_config.config),
        Commands::Get(args) => cmd::get::run(args, &store),
        Commands::Upsert(args) => cmd::upsert::run(args, &store, &loaded_config.config),
        Commands::Read(args) => cmd::read::run(args, &store),
        Commands::Path(args) => cmd::path::run(args, &store),
        Commands::Remove(args) => cmd::remove::run(args, &store),
        Commands::Config(args) => cmd::config_cmd::run(args),
        Commands::Completion(_) => unreachable!(), // Handled above
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        process::exit(1);
    }
}
