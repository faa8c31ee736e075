use crate::error::Error;
use crate::extractor::RouteExtractor;
use crate::fetcher::{ContentFetcher, ContentSource};
use crate::renderer;
use crate::report::RouteReport;
use crate::resolver;
use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, info, warn};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;

/// Environment variable consulted when no `--token` is given.
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Report file names, written to the output directory.
const TEXT_REPORT: &str = "extracted_routes.txt";
const JSON_REPORT: &str = "extracted_routes.json";
const MARKDOWN_REPORT: &str = "extracted_routes.md";

/// Laravel route extractor - scans a GitHub-hosted backend for route declarations
#[derive(Parser, Debug)]
#[command(name = "routes-from-github")]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Repository owner (user or organization)
    #[arg(long, default_value = "Zontec-Software")]
    pub owner: String,

    /// Repository name
    #[arg(long, default_value = "thalamus-backend-laravel")]
    pub repo: String,

    /// Personal access token (falls back to GITHUB_TOKEN, then to a prompt)
    #[arg(long, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Candidate routes-file path; repeat to override the default search list
    #[arg(long = "path", value_name = "PATH")]
    pub paths: Vec<String>,

    /// Directory the three report files are written to
    #[arg(short = 'o', long = "output-dir", default_value = ".")]
    pub output_dir: PathBuf,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse command line arguments
pub fn parse_args() -> Result<CliArgs> {
    let args = CliArgs::parse();
    parse_args_from_parsed(args)
}

/// Validate and log already-parsed arguments
pub fn parse_args_from_parsed(args: CliArgs) -> Result<CliArgs> {
    debug!("Parsed arguments: {:?}", args);

    if args.output_dir.exists() && !args.output_dir.is_dir() {
        bail!(
            "Output path is not a directory: {}",
            args.output_dir.display()
        );
    }

    info!("Repository: {}/{}", args.owner, args.repo);
    if args.paths.is_empty() {
        info!("Candidate paths: defaults ({:?})", resolver::DEFAULT_CANDIDATES);
    } else {
        info!("Candidate paths: {:?}", args.paths);
    }
    info!("Output directory: {}", args.output_dir.display());

    Ok(args)
}

/// Run the main workflow
pub fn run(args: CliArgs) -> Result<()> {
    let token = resolve_token(&args)?;
    let repository = format!("{}/{}", args.owner, args.repo);

    let fetcher = ContentFetcher::new(&args.owner, &args.repo, &token)?;

    // Step 1: confirm the repository is reachable with this token
    info!("[1/4] Verifying repository access...");
    verify_access(&fetcher)?;

    // Step 2: locate the routes file
    info!("[2/4] Resolving routes file...");
    let candidates: Vec<String> = if args.paths.is_empty() {
        resolver::DEFAULT_CANDIDATES
            .iter()
            .map(|p| p.to_string())
            .collect()
    } else {
        args.paths.clone()
    };
    let (file_path, content) = resolver::resolve_routes_file(&fetcher, &candidates)?;

    // Step 3: extract route records
    info!("[3/4] Extracting routes...");
    let extractor = RouteExtractor::new();
    let routes = extractor.extract(&content);
    info!("Extracted {} routes", routes.len());
    if routes.is_empty() {
        warn!("No route declarations recognized in {}", file_path);
    }

    // Step 4: render the three reports and write them out
    info!("[4/4] Rendering reports...");
    let report = RouteReport::new(repository, file_path, routes);
    let text = renderer::render_text(&report);
    let json = renderer::serialize_json(&report)?;
    let markdown = renderer::render_markdown(&report);

    for (file_name, rendered) in [
        (TEXT_REPORT, &text),
        (JSON_REPORT, &json),
        (MARKDOWN_REPORT, &markdown),
    ] {
        let path = args.output_dir.join(file_name);
        renderer::write_to_file(rendered, &path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    println!("{}", text);

    Ok(())
}

/// Resolves the access token: `--token`, then the environment, then an
/// interactive prompt. Fails with guidance - before any network call -
/// when no token can be obtained.
fn resolve_token(args: &CliArgs) -> Result<String> {
    if let Some(token) = &args.token {
        let token = token.trim();
        if !token.is_empty() {
            return Ok(token.to_string());
        }
    }

    if let Ok(token) = std::env::var(TOKEN_ENV) {
        let token = token.trim();
        if !token.is_empty() {
            debug!("Using token from {}", TOKEN_ENV);
            return Ok(token.to_string());
        }
    }

    if !io::stdin().is_terminal() {
        bail!("{}", token_guidance());
    }

    eprintln!("{}", token_guidance());
    eprint!("\nPaste your personal access token: ");
    let _ = io::stderr().flush();

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read token from stdin")?;
    let token = line.trim().to_string();
    if token.is_empty() {
        bail!("No token provided. {}", token_guidance());
    }

    Ok(token)
}

fn token_guidance() -> String {
    format!(
        "A GitHub personal access token is required; the API no longer accepts\n\
         password authentication.\n\
         \n\
         1. Open https://github.com/settings/tokens\n\
         2. Generate a new token (classic) with the 'repo' scope\n\
         3. Export it as {} or pass it with --token",
        TOKEN_ENV
    )
}

/// Lists the repository root before resolving candidates, surfacing a bad
/// token or unreachable repository early. When a `routes/` directory is
/// present its entries are logged as a hint for `--path` overrides.
/// Listing failures other than an authentication failure are diagnostic
/// only and do not stop the run.
fn verify_access<S: ContentSource>(source: &S) -> Result<()> {
    match source.list("") {
        Ok(entries) => {
            debug!("Repository root has {} entries", entries.len());
            if entries
                .iter()
                .any(|e| e.name == "routes" && e.entry_type == "dir")
            {
                match source.list("routes") {
                    Ok(route_entries) => {
                        for entry in &route_entries {
                            info!("routes/{}", entry.name);
                        }
                    }
                    Err(err) => warn!("Could not list routes/: {}", err),
                }
            }
            Ok(())
        }
        Err(err @ Error::AuthFailure) => Err(err.into()),
        Err(err) => {
            warn!("Could not list repository root: {}", err);
            Ok(())
        }
    }
}
