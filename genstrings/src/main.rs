//! genstrings — collect localized string literals into one `.strings` table
//!
//! Walks the current directory for Swift sources, extracts every localized
//! literal, and prints a table to stdout with one section per source file
//! plus a shared section for strings used by more than one file.

use anyhow::{Context, Result};
use std::io::{self, BufWriter};
use std::path::Path;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod classify;
mod config;
mod extract;
mod render;
mod rules;
mod scan;

use crate::extract::Extractor;

fn main() {
    init_logging();

    if let Err(e) = run() {
        eprintln!("genstrings failed: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let config = config::load_config()?;
    let rules = config.build_rules()?;
    debug!(
        "Rules: {}",
        rules.iter().map(|r| r.name()).collect::<Vec<_>>().join(", ")
    );
    let suffix = config.suffix();

    let files = scan::find_sources(Path::new("."), &suffix);
    info!("Found {} *{suffix} files", files.len());

    let entries = Extractor::new(rules).extract_files(&files)?;
    let extracted = entries.len();

    let table = classify::classify(entries);
    if table.is_empty() {
        warn!("No localized strings found");
    }
    info!(
        "Extracted {extracted} strings: {} kept across {} files, {} shared",
        table.len(),
        table.files.len(),
        table.shared.len()
    );

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    render::render(&table, &mut out).context("Failed to write strings table")?;

    Ok(())
}

fn init_logging() {
    // stdout carries the table
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .init();
}
