//! Annotation scans over a single matched declaration line.
//!
//! Three independent, order-insensitive scans pull path parameters,
//! middleware tokens and the symbolic route name out of a line the
//! extractor has already matched. None of them can fail: absence of a
//! match yields an empty result.

use crate::extractor::RouteParameter;
use regex::Regex;
use std::collections::BTreeSet;

pub struct AnnotationScanner {
    parameter: Regex,
    middleware_string: Regex,
    middleware_array: Regex,
    quoted: Regex,
    name: Regex,
}

impl AnnotationScanner {
    pub fn new() -> Self {
        Self {
            parameter: Regex::new(r"\{(\w+)(?::([^}]+))?\}").expect("valid regex"),
            middleware_string: Regex::new(r#"->middleware\s*\(\s*['"]([^'"]+)['"]"#)
                .expect("valid regex"),
            middleware_array: Regex::new(r"->middleware\s*\(\s*\[([^\]]+)\]")
                .expect("valid regex"),
            quoted: Regex::new(r#"['"]([^'"]+)['"]"#).expect("valid regex"),
            name: Regex::new(r#"->name\s*\(\s*['"]([^'"]+)['"]"#).expect("valid regex"),
        }
    }

    /// `{ident}` and `{ident:constraint}` placeholders, scanned over the
    /// path value only. Route parameters are always required.
    pub fn parameters(&self, path: &str) -> Vec<RouteParameter> {
        self.parameter
            .captures_iter(path)
            .map(|caps| RouteParameter::new(&caps[1], caps.get(2).map(|m| m.as_str())))
            .collect()
    }

    /// Middleware attachments in either form: a single string (possibly a
    /// comma-separated list) or an array literal of strings. Tokens from
    /// both forms are unioned and deduplicated.
    pub fn middlewares(&self, line: &str) -> BTreeSet<String> {
        let mut tokens = BTreeSet::new();

        if let Some(caps) = self.middleware_string.captures(line) {
            for token in caps[1].split(',') {
                let token = token.trim();
                if !token.is_empty() {
                    tokens.insert(token.to_string());
                }
            }
        }

        if let Some(caps) = self.middleware_array.captures(line) {
            for quoted in self.quoted.captures_iter(&caps[1]) {
                tokens.insert(quoted[1].to_string());
            }
        }

        tokens
    }

    /// `->name('x')` attachment. When chained more than once on a line the
    /// last occurrence wins, consistent with builder calls applying left to
    /// right.
    pub fn route_name(&self, line: &str) -> Option<String> {
        self.name
            .captures_iter(line)
            .last()
            .map(|caps| caps[1].to_string())
    }
}

impl Default for AnnotationScanner {
    fn default() -> Self {
        Self::new()
    }
}
