//! List the built-in reaction sets.

use anyhow::Result;
use colored::Colorize;
use squirm::prelude::*;

pub fn run(preset: Option<&str>) -> Result<()> {
    match preset {
        Some(name) => show(name),
        None => list(),
    }
}

fn list() -> Result<()> {
    println!("{}", "Built-in reaction sets".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    for preset in Preset::ALL {
        let count = preset.rules()?.len();
        println!(
            "  {} {:>3} rules  {}",
            format!("{:<18}", preset.name()).cyan(),
            count,
            preset.description().dimmed()
        );
    }
    println!();
    println!("Show one with {}", "squirm rules <name>".cyan());
    Ok(())
}

fn show(name: &str) -> Result<()> {
    let preset: Preset = name.parse()?;
    println!("{} {}", preset.name().white().bold(), preset.description().dimmed());
    println!("{}", "═".repeat(40).dimmed());
    for (i, rule) in preset.rules()?.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, rule);
    }
    Ok(())
}
