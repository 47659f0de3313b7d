use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use unreal_prune::{logging, prune_with, DeletionSet};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Remove Binaries, Intermediate, Saved and DerivedDataCache folders from the Unreal project in the current directory",
    long_about = None
)]
struct Args {}

fn main() -> Result<()> {
    let _args = Args::parse();
    logging::init();

    // Load the deletion set before touching the tree
    let deletion_set = DeletionSet::unreal()?;
    let root = std::env::current_dir().context("Failed to determine current directory")?;

    println!("{}", "Cleaning Unreal project...".bold());

    let report = prune_with(&root, &deletion_set, |path| {
        println!("Deleted: {}", path.display());
    })?;

    println!("{}", "Done.".green().bold());
    if report.failed.is_empty() {
        println!("{}", report.summary());
    } else {
        println!("{}", report.summary().yellow());
    }

    Ok(())
}
