//! Laravel route extractor - mines route declarations out of a GitHub-hosted
//! backend and renders them as reports.
//!
//! The tool fetches a routes file through the GitHub contents API, scans it
//! with an ordered set of declaration recognizers, and renders the collected
//! records into three deterministic formats (plain text, JSON, Markdown).
//! It is a best-effort scraper over the route-declaration idioms of the
//! backend, not a parser of the source language.
//!
//! # Pipeline
//!
//! 1. [`fetcher`] - retrieves and decodes file contents from the repository
//! 2. [`resolver`] - tries the conventional routes-file locations in order
//! 3. [`extractor`] - turns matched declaration lines into route records
//! 4. [`report`] - bundles records with the source metadata
//! 5. [`renderer`] - produces the text, JSON and Markdown outputs
//!
//! # Example Usage
//!
//! ```no_run
//! use routes_from_github::{
//!     extractor::RouteExtractor,
//!     fetcher::ContentFetcher,
//!     renderer::{render_text, serialize_json},
//!     report::RouteReport,
//!     resolver::{resolve_routes_file, DEFAULT_CANDIDATES},
//! };
//!
//! let fetcher = ContentFetcher::new("acme", "backend", "ghp_token").unwrap();
//! let candidates: Vec<String> = DEFAULT_CANDIDATES.iter().map(|p| p.to_string()).collect();
//! let (path, content) = resolve_routes_file(&fetcher, &candidates).unwrap();
//!
//! let routes = RouteExtractor::new().extract(&content);
//! let report = RouteReport::new("acme/backend".to_string(), path, routes);
//!
//! println!("{}", render_text(&report));
//! let json = serialize_json(&report).unwrap();
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module which provides a complete
//! CLI application.

pub mod cli;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod renderer;
pub mod report;
pub mod resolver;
