//! Candidate-path resolution for the routes file.
//!
//! Laravel projects keep their route definitions in a handful of
//! conventional locations; the resolver tries each in order and settles on
//! the first that exists.

use crate::error::{Error, Result};
use crate::fetcher::ContentSource;
use log::{info, warn};

/// Locations tried when no explicit path is given, in order.
pub const DEFAULT_CANDIDATES: &[&str] = &[
    "routes/api.php",
    "routes/web.php",
    "app/routes/api.php",
    "app/Http/routes/api.php",
];

/// Tries each candidate path in order and returns `(path, content)` for the
/// first one that resolves.
///
/// An authentication failure aborts immediately: it is not path-specific,
/// so trying the remaining candidates would only repeat the same rejection.
/// A transport error on one candidate is logged and the next candidate is
/// tried. When every candidate is exhausted the result is
/// [`Error::RoutesFileNotFound`] naming all attempted paths.
pub fn resolve_routes_file<S: ContentSource>(
    source: &S,
    candidates: &[String],
) -> Result<(String, String)> {
    for path in candidates {
        info!("Trying candidate path: {}", path);
        match source.fetch(path) {
            Ok(content) => {
                info!("Found routes file: {} ({} bytes)", path, content.len());
                return Ok((path.clone(), content));
            }
            Err(Error::NotFound { .. }) => {
                info!("Not found: {}", path);
            }
            Err(err @ Error::AuthFailure) => return Err(err),
            Err(err) => {
                warn!("Skipping candidate {}: {}", path, err);
            }
        }
    }

    Err(Error::RoutesFileNotFound {
        attempted: candidates.to_vec(),
    })
}
