//! Run the simulation.

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use squirm::prelude::*;
use std::path::PathBuf;

use crate::config::Config;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Number of ticks to run
    #[arg(short, long, default_value = "1000")]
    pub ticks: u64,

    /// Random seed (overrides the config)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Reaction preset (overrides the config)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Enable floods with this period in ticks
    #[arg(short, long)]
    pub flood: Option<u64>,

    /// Print the grid after the run
    #[arg(long)]
    pub show: bool,

    /// Print stats and census as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Check grid and bond invariants after every tick
    #[arg(long)]
    pub audit: bool,

    /// Config file (default: squirm.toml in this or a parent directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunReport {
    stats: WorldStats,
    census: Census,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let mut builder = config.builder();
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    if let Some(name) = &args.preset {
        let preset: Preset = name.parse()?;
        builder = builder.preset(preset);
    }
    if let Some(period) = args.flood {
        builder = builder.flood_every(period);
    }
    let mut world = builder.build().context("Failed to build world")?;

    if !args.json {
        println!(
            "{} Running {} ticks on a {}x{} grid ({} cells, {} rules)...",
            "→".blue(),
            args.ticks.to_string().cyan(),
            world.width(),
            world.height(),
            world.population().len().to_string().cyan(),
            world.chemistry().len().to_string().cyan()
        );
    }

    let pb = if args.json {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(args.ticks)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} ticks")?
            .progress_chars("#>-"),
    );

    for _ in 0..args.ticks {
        world.tick();
        if args.audit {
            world
                .audit()
                .with_context(|| format!("Invariant broken at tick {}", world.current_tick()))?;
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let report = RunReport {
        stats: world.stats(),
        census: world.census(),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    if args.show {
        print_grid(&world);
    }

    Ok(())
}

fn print_report(report: &RunReport) {
    let RunReport { stats, census } = report;
    println!();
    println!("{} Simulation complete!", "✓".green().bold());
    println!("{}", "═".repeat(40).dimmed());

    println!("{}", "Activity".blue().bold());
    println!("  Ticks:             {}", stats.tick.to_string().cyan());
    println!("  Reactions fired:   {}", stats.reactions.to_string().cyan());
    println!("  Moves:             {}", stats.moves.to_string().cyan());
    println!("  Floods:            {}", stats.floods.to_string().cyan());
    println!(
        "  Spawned/destroyed: {} / {}",
        stats.spawned.to_string().green(),
        stats.destroyed.to_string().yellow()
    );
    println!();

    println!("{}", "Census".blue().bold());
    println!("  Live cells:        {}", census.cells.to_string().cyan());
    for (species, count) in &census.species {
        println!("    {}                {}", paint(species.code()), count);
    }
    println!("  Bonds:             {}", census.bonds.to_string().cyan());
    println!("  Bonded cells:      {}", census.bonded_cells.to_string().cyan());
    println!("  Polymers:          {}", census.polymers.to_string().cyan());
    println!("  Longest polymer:   {}", census.longest_polymer.to_string().cyan());
}

fn print_grid(world: &World) {
    println!();
    for y in 0..world.height() {
        let row: String = (0..world.width())
            .map(|x| {
                let label = world.contents(x as i64, y as i64);
                match label.chars().next() {
                    Some(code) => paint(code).to_string(),
                    None => ".".dimmed().to_string(),
                }
            })
            .collect();
        println!("{row}");
    }
}

fn paint(code: char) -> ColoredString {
    let text = code.to_string();
    match code {
        'e' => text.red(),
        'f' => text.green(),
        'a' => text.yellow(),
        'b' => text.blue(),
        'c' => text.magenta(),
        'd' => text.cyan(),
        _ => text.normal(),
    }
}
