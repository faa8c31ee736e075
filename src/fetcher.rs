//! GitHub contents API client.
//!
//! The contents endpoint returns file payloads base64-encoded inside a JSON
//! envelope; [`ContentFetcher::fetch`] decodes them back to UTF-8 text. The
//! same endpoint doubles as a directory listing when the path names a
//! directory (or is empty, for the repository root).
//!
//! Only token authentication is supported: password-based basic auth is no
//! longer accepted by the upstream host.

use crate::error::{Error, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use serde::Deserialize;
use std::time::Duration;

const API_ROOT: &str = "https://api.github.com";
const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("routes-from-github/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout. Requests exceeding it fail with a transport error;
/// the fetcher itself never retries.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read access to the contents of a remote repository.
///
/// The candidate-path resolver and the CLI work against this trait so they
/// can be exercised with canned content in tests instead of a live host.
pub trait ContentSource {
    /// Fetches the decoded text content of the file at `path`.
    fn fetch(&self, path: &str) -> Result<String>;

    /// Lists the entries of the directory at `path` (empty string for the
    /// repository root).
    fn list(&self, path: &str) -> Result<Vec<RepoEntry>>;
}

/// One entry of a directory listing.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoEntry {
    pub name: String,
    /// "file" or "dir", as reported by the API.
    #[serde(rename = "type")]
    pub entry_type: String,
}

/// JSON envelope returned by the contents endpoint for a single file.
#[derive(Debug, Deserialize)]
struct ContentEnvelope {
    content: Option<String>,
}

/// Blocking client for the GitHub contents API.
pub struct ContentFetcher {
    client: reqwest::blocking::Client,
    owner: String,
    repo: String,
    token: String,
}

impl ContentFetcher {
    /// Creates a fetcher bound to one repository and credential.
    pub fn new(owner: &str, repo: &str, token: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
            token: token.to_string(),
        })
    }

    fn get(&self, path: &str) -> Result<reqwest::blocking::Response> {
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            API_ROOT, self.owner, self.repo, path
        );
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", ACCEPT_HEADER)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        Err(status_error(status.as_u16(), &body, path))
    }
}

impl ContentSource for ContentFetcher {
    fn fetch(&self, path: &str) -> Result<String> {
        let envelope: ContentEnvelope = self.get(path)?.json()?;
        decode_content(&envelope, path)
    }

    fn list(&self, path: &str) -> Result<Vec<RepoEntry>> {
        Ok(self.get(path)?.json()?)
    }
}

/// Maps a non-2xx status to the error taxonomy: 401 is an authentication
/// failure, 404 means the path does not exist at this revision, everything
/// else is a transport error carrying status and body.
fn status_error(status: u16, body: &str, path: &str) -> Error {
    match status {
        401 => Error::AuthFailure,
        404 => Error::NotFound {
            path: path.to_string(),
        },
        _ => Error::Transport {
            detail: format!("HTTP {} for {}: {}", status, path, body),
        },
    }
}

/// Decodes the base64 `content` field of a file envelope.
///
/// The API wraps the payload in 60-column lines, so whitespace is stripped
/// before decoding. The decoded bytes must be valid UTF-8.
fn decode_content(envelope: &ContentEnvelope, path: &str) -> Result<String> {
    let encoded = envelope.content.as_deref().ok_or_else(|| {
        Error::SerializationError(format!("no content field in envelope for {}", path))
    })?;

    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact.as_bytes()).map_err(|e| {
        Error::SerializationError(format!("invalid base64 content for {}: {}", path, e))
    })?;

    String::from_utf8(bytes).map_err(|e| {
        Error::SerializationError(format!("content of {} is not valid UTF-8: {}", path, e))
    })
}
