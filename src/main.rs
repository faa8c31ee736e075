//! Laravel route extractor - command-line entry point.
//!
//! Fetches a route-definition file from a GitHub-hosted repository, extracts
//! the declared routes, and writes plain-text, JSON and Markdown reports to
//! the output directory.
//!
//! # Usage
//!
//! ```bash
//! routes-from-github [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Scan the default backend repository:
//! ```bash
//! GITHUB_TOKEN=ghp_xxx routes-from-github
//! ```
//!
//! Scan another repository and write reports elsewhere:
//! ```bash
//! routes-from-github --owner acme --repo backend -o reports/
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! routes-from-github -v
//! ```

mod cli;
mod error;
mod extractor;
mod fetcher;
mod renderer;
mod report;
mod resolver;

use anyhow::Result;
use clap::Parser;
use log::info;

fn main() -> Result<()> {
    // We need to parse args twice: once to get verbose flag, then again after logger init
    // First, do a quick parse just to check for verbose flag
    let args_for_verbose = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Laravel route extractor starting...");

    // Now do the full parse with validation
    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    // Run the main workflow
    cli::run(args)?;

    info!("Route extraction completed successfully");

    Ok(())
}
