//! Squirm CLI - headless runs of the Squirm artificial chemistry.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser)]
#[command(name = "squirm")]
#[command(author, version, about = "Squirm - self-replicating molecules on a bonded grid", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default squirm.toml
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite an existing squirm.toml
        #[arg(long)]
        force: bool,
    },

    /// Run the simulation and print a census
    Run(commands::run::RunArgs),

    /// List the built-in reaction sets, or print one of them
    Rules {
        /// Preset name (e.g. "replicator", "membrane")
        preset: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path, force } => commands::init::run(path, force),
        Commands::Run(args) => commands::run::run(&args),
        Commands::Rules { preset } => commands::rules::run(preset.as_deref()),
    }
}
