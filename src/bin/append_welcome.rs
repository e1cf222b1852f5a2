//! Appends welcome-dialog strings to the UI translation template.
//!
//! Usage:
//!   append-welcome welcome.pot ui.pot
//!
//! Entries html2po extracted from `<head><meta>` and empty msgids are skipped;
//! the rest are appended to the target, whose `Content-Type` is forced to
//! UTF-8 before it is rewritten at 78 columns.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use welcome_catalog::{MergeOptions, init_logging, merge_files};

#[derive(Parser, Debug)]
#[command(name = "append-welcome")]
#[command(version)]
#[command(about = "Append welcome dialog strings to a UI gettext catalog")]
struct Cli {
    /// Welcome dialog catalog produced by html2po; read only.
    source: PathBuf,
    /// UI catalog to append to; rewritten in place.
    target: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging();
    if let Err(err) = run(&cli) {
        eprintln!("append-welcome: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    merge_files(&cli.source, &cli.target, &MergeOptions::default()).with_context(|| {
        format!(
            "appending {} to {}",
            cli.source.display(),
            cli.target.display()
        )
    })?;
    Ok(())
}
