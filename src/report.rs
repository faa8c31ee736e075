//! Assembled extraction report: source metadata plus the extracted records.

use crate::extractor::{DeclarationKind, HttpMethod, RouteRecord};
use serde::{Deserialize, Serialize};

/// Everything the renderers need. Serialized verbatim as the JSON report,
/// so deserializing that report reproduces the record list field for field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteReport {
    /// `owner/repo` identity of the scanned repository.
    pub repository: String,
    /// Path of the routes file the resolver settled on.
    pub file: String,
    pub total_routes: usize,
    pub routes: Vec<RouteRecord>,
}

impl RouteReport {
    pub fn new(repository: String, file: String, routes: Vec<RouteRecord>) -> Self {
        Self {
            repository,
            file,
            total_routes: routes.len(),
            routes,
        }
    }

    /// Records with the given method, in input order.
    pub fn routes_for(&self, method: HttpMethod) -> Vec<&RouteRecord> {
        self.routes.iter().filter(|r| r.method == method).collect()
    }

    pub fn count_for_method(&self, method: HttpMethod) -> usize {
        self.routes.iter().filter(|r| r.method == method).count()
    }

    pub fn count_for_kind(&self, kind: DeclarationKind) -> usize {
        self.routes.iter().filter(|r| r.kind == kind).count()
    }
}
