//! htmltreediff CLI
//!
//! Prints the indented diff of two markup files to stdout.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use html_tree_diff::{diff, DiffOptions};

/// Show the changes between two HTML documents
#[derive(Parser)]
#[command(name = "htmltreediff")]
#[command(version)]
#[command(about = "Show the changes between two HTML documents", long_about = None)]
struct Cli {
    /// Old version
    old: PathBuf,
    /// New version
    new: PathBuf,
}

fn read(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let cli = Cli::parse();

    let old = read(&cli.old)?;
    let new = read(&cli.new)?;

    let html = diff(&old, &new, &DiffOptions::new().pretty()).context("failed to diff documents")?;
    println!("{html}");
    Ok(())
}
