use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{optimize::OptimizeArgs, optimize_dataset::OptimizeDatasetArgs};

mod file_utils;
mod optimize;
mod optimize_dataset;
mod parsers;
mod search_args;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a single JSON problem
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Solve every JSON problem of a folder and print a summary
    OptimizeDataset {
        #[command(flatten)]
        args: OptimizeDatasetArgs,
    },
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    match cli.command {
        Commands::Optimize { args } => optimize::run(args)?,
        Commands::OptimizeDataset { args } => optimize_dataset::run(args)?,
    }

    Ok(())
}
