mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{CleanCommand, FetchCommand, OutputFormat, ProjectOptions, ResolveCommand};

#[derive(Parser)]
#[command(name = "remote-keystore")]
#[command(about = "Fetch build signing credentials from blob storage, with a built-in fallback", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the keystore and descriptor, then print signing properties
    Fetch {
        #[command(flatten)]
        project: ProjectOptions,

        /// Output format for the signing properties
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Properties)]
        format: OutputFormat,

        /// Write the signing properties to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// HTTP request timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout: u64,

        /// Print debug messages
        #[arg(short, long)]
        verbose: bool,
    },

    /// Delete downloaded and materialized credential files
    Clean {
        #[command(flatten)]
        project: ProjectOptions,
    },

    /// Show which source provides each connection parameter
    Resolve {
        #[command(flatten)]
        project: ProjectOptions,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Fetch {
            project,
            format,
            output,
            timeout,
            verbose,
        } => {
            FetchCommand {
                project,
                format,
                output,
                timeout_secs: timeout,
                verbose,
            }
            .execute()?;
        }
        Commands::Clean { project } => {
            CleanCommand::execute(&project)?;
        }
        Commands::Resolve { project } => {
            ResolveCommand::execute(&project)?;
        }
    }

    Ok(())
}
