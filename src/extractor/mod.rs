//! Route extraction from Laravel route-definition source.
//!
//! The extractor scans the fetched text line by line and applies an ordered
//! set of recognizers for the route-declaration idioms the backend uses.
//! It is a best-effort scraper over the declaration syntax, not a parser of
//! it: lines matching no recognizer contribute nothing and no error is ever
//! raised for them.
//!
//! # Recognized declaration forms
//!
//! In priority order (the first match wins):
//!
//! 1. `Route::get('/path', [Controller::class, 'action'])`
//! 2. `Route::get('/path', 'Controller@action')`
//! 3. `Route::resource('path', Controller::class)`
//! 4. `Route::apiResource('path', Controller::class)`
//! 5. `Route::get('/path', function () { ... })`
//!
//! Resource shorthands (3 and 4) expand to six conventional CRUD records
//! each. Declarations spread over several lines are accumulated until their
//! parentheses balance and are then processed as one line, attributed to the
//! line where they began.

pub mod annotations;

use crate::extractor::annotations::AnnotationScanner;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// HTTP verbs accepted in route declarations, including the `any`/`match`
/// wildcards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Any,
    Match,
}

impl HttpMethod {
    /// Fixed ordering used when grouping report output.
    pub const REPORT_ORDER: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Any,
        HttpMethod::Match,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Any => "ANY",
            HttpMethod::Match => "MATCH",
        }
    }

    fn from_verb(verb: &str) -> Option<HttpMethod> {
        match verb {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "patch" => Some(HttpMethod::Patch),
            "delete" => Some(HttpMethod::Delete),
            "options" => Some(HttpMethod::Options),
            "any" => Some(HttpMethod::Any),
            "match" => Some(HttpMethod::Match),
            _ => None,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The destination a route dispatches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Handler {
    /// A controller class and action method.
    Controller { controller: String, action: String },
    /// An inline closure; no symbolic target exists.
    Closure,
}

impl std::fmt::Display for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Handler::Controller { controller, action } => {
                write!(f, "{}::{}", controller, action)
            }
            Handler::Closure => f.write_str("Closure"),
        }
    }
}

/// How a record was produced from its declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationKind {
    /// `[Controller::class, 'action']` array reference
    ControllerClass,
    /// `'Controller@action'` string reference
    ControllerString,
    /// Inline closure handler
    Closure,
    /// Expanded from a `Route::resource` shorthand
    Resource,
    /// Expanded from a `Route::apiResource` shorthand
    ApiResource,
}

impl DeclarationKind {
    /// Fixed ordering used in report summaries.
    pub const REPORT_ORDER: [DeclarationKind; 5] = [
        DeclarationKind::ControllerClass,
        DeclarationKind::ControllerString,
        DeclarationKind::Closure,
        DeclarationKind::Resource,
        DeclarationKind::ApiResource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeclarationKind::ControllerClass => "controller_class",
            DeclarationKind::ControllerString => "controller_string",
            DeclarationKind::Closure => "closure",
            DeclarationKind::Resource => "resource",
            DeclarationKind::ApiResource => "api_resource",
        }
    }
}

/// A placeholder in a path template, `{name}` or `{name:constraint}`.
///
/// Route parameters are always required; no optional-parameter syntax is
/// recognized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteParameter {
    pub name: String,
    pub constraint: Option<String>,
    pub required: bool,
}

impl RouteParameter {
    pub fn new(name: &str, constraint: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            constraint: constraint.map(str::to_string),
            required: true,
        }
    }
}

/// One HTTP-routable endpoint derived from a declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub method: HttpMethod,
    /// URL path template, possibly containing `{name}` placeholders.
    pub path: String,
    pub handler: Handler,
    /// Parameters derived from the `{...}` tokens in `path`.
    pub parameters: Vec<RouteParameter>,
    /// Deduplicated middleware tokens; serialized in sorted order.
    pub middlewares: BTreeSet<String>,
    /// Symbolic route name, when one was attached.
    pub name: Option<String>,
    /// 1-based line in the fetched content where the declaration began.
    pub source_line: usize,
    pub kind: DeclarationKind,
}

/// The six conventional actions a resource shorthand expands to. The bool
/// marks actions addressing a single item, which carry an `{id}` segment.
const RESOURCE_ACTIONS: [(HttpMethod, &str, bool); 6] = [
    (HttpMethod::Get, "index", false),
    (HttpMethod::Post, "store", false),
    (HttpMethod::Get, "show", true),
    (HttpMethod::Put, "update", true),
    (HttpMethod::Patch, "update", true),
    (HttpMethod::Delete, "destroy", true),
];

/// Line-oriented extractor for route declarations.
pub struct RouteExtractor {
    controller_class: Regex,
    controller_string: Regex,
    resource: Regex,
    api_resource: Regex,
    closure: Regex,
    declaration_start: Regex,
    annotations: AnnotationScanner,
}

impl RouteExtractor {
    pub fn new() -> Self {
        const VERBS: &str = "get|post|put|patch|delete|options|any|match";
        let verb_call = |handler_pattern: &str| {
            format!(
                r#"Route::({VERBS})\s*\(\s*['"]([^'"]+)['"]\s*,\s*{handler_pattern}"#
            )
        };

        Self {
            controller_class: Regex::new(&verb_call(
                r#"\[\s*([^:\]]+)::class\s*,\s*['"]([^'"]+)['"]"#,
            ))
            .expect("valid regex"),
            controller_string: Regex::new(&verb_call(r#"['"]([^@'"]+)@([^'"]+)['"]"#))
                .expect("valid regex"),
            resource: Regex::new(
                r#"Route::resource\s*\(\s*['"]([^'"]+)['"]\s*,\s*([^:\]]+)::class"#,
            )
            .expect("valid regex"),
            api_resource: Regex::new(
                r#"Route::apiResource\s*\(\s*['"]([^'"]+)['"]\s*,\s*([^:\]]+)::class"#,
            )
            .expect("valid regex"),
            closure: Regex::new(&verb_call("function")).expect("valid regex"),
            declaration_start: Regex::new(&format!(
                r"Route::({VERBS}|resource|apiResource)\s*\("
            ))
            .expect("valid regex"),
            annotations: AnnotationScanner::new(),
        }
    }

    /// Extracts all route records from the given content, in order of first
    /// appearance. Resource expansions appear as a contiguous block of six
    /// records at the position of the expanded declaration.
    pub fn extract(&self, content: &str) -> Vec<RouteRecord> {
        let mut records = Vec::new();
        // Buffered text and starting line of an unterminated declaration
        let mut pending: Option<(String, usize)> = None;

        for (idx, raw) in content.lines().enumerate() {
            let line_no = idx + 1;
            let stripped = raw.trim();

            // Whole-line comments are skipped, even while accumulating
            if stripped.starts_with("//") || stripped.starts_with('#') {
                continue;
            }

            if let Some((mut buffer, start_line)) = pending.take() {
                buffer.push(' ');
                buffer.push_str(stripped);
                if is_complete(&buffer) {
                    records.extend(self.match_line(&buffer, start_line));
                } else {
                    pending = Some((buffer, start_line));
                }
                continue;
            }

            let matched = self.match_line(stripped, line_no);
            if !matched.is_empty() {
                records.extend(matched);
                continue;
            }

            if self.declaration_start.is_match(stripped) && !is_complete(stripped) {
                pending = Some((stripped.to_string(), line_no));
            }
        }

        records
    }

    /// Applies the recognizers in priority order against one (possibly
    /// accumulated) line of text. The first match wins; a line matching
    /// none contributes zero records.
    fn match_line(&self, line: &str, line_no: usize) -> Vec<RouteRecord> {
        self.match_controller_class(line, line_no)
            .or_else(|| self.match_controller_string(line, line_no))
            .or_else(|| self.match_resource(line, line_no))
            .or_else(|| self.match_api_resource(line, line_no))
            .or_else(|| self.match_closure(line, line_no))
            .unwrap_or_default()
    }

    fn match_controller_class(&self, line: &str, line_no: usize) -> Option<Vec<RouteRecord>> {
        let caps = self.controller_class.captures(line)?;
        let method = HttpMethod::from_verb(caps.get(1)?.as_str())?;
        let path = caps.get(2)?.as_str().to_string();
        let handler = Handler::Controller {
            controller: caps.get(3)?.as_str().trim().to_string(),
            action: caps.get(4)?.as_str().to_string(),
        };
        Some(vec![self.single_record(
            method,
            path,
            handler,
            DeclarationKind::ControllerClass,
            line,
            line_no,
        )])
    }

    fn match_controller_string(&self, line: &str, line_no: usize) -> Option<Vec<RouteRecord>> {
        let caps = self.controller_string.captures(line)?;
        let method = HttpMethod::from_verb(caps.get(1)?.as_str())?;
        let path = caps.get(2)?.as_str().to_string();
        let handler = Handler::Controller {
            controller: caps.get(3)?.as_str().trim().to_string(),
            action: caps.get(4)?.as_str().to_string(),
        };
        Some(vec![self.single_record(
            method,
            path,
            handler,
            DeclarationKind::ControllerString,
            line,
            line_no,
        )])
    }

    fn match_resource(&self, line: &str, line_no: usize) -> Option<Vec<RouteRecord>> {
        let caps = self.resource.captures(line)?;
        Some(self.expand_resource(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str().trim(),
            DeclarationKind::Resource,
            line,
            line_no,
        ))
    }

    fn match_api_resource(&self, line: &str, line_no: usize) -> Option<Vec<RouteRecord>> {
        let caps = self.api_resource.captures(line)?;
        Some(self.expand_resource(
            caps.get(1)?.as_str(),
            caps.get(2)?.as_str().trim(),
            DeclarationKind::ApiResource,
            line,
            line_no,
        ))
    }

    fn match_closure(&self, line: &str, line_no: usize) -> Option<Vec<RouteRecord>> {
        let caps = self.closure.captures(line)?;
        let method = HttpMethod::from_verb(caps.get(1)?.as_str())?;
        let path = caps.get(2)?.as_str().to_string();
        Some(vec![self.single_record(
            method,
            path,
            Handler::Closure,
            DeclarationKind::Closure,
            line,
            line_no,
        )])
    }

    /// Builds one record for a single-route form, running all three
    /// annotation scans against the matched line.
    fn single_record(
        &self,
        method: HttpMethod,
        path: String,
        handler: Handler,
        kind: DeclarationKind,
        line: &str,
        line_no: usize,
    ) -> RouteRecord {
        RouteRecord {
            method,
            parameters: self.annotations.parameters(&path),
            middlewares: self.annotations.middlewares(line),
            name: self.annotations.route_name(line),
            path,
            handler,
            source_line: line_no,
            kind,
        }
    }

    /// Expands a resource shorthand into its six conventional records.
    ///
    /// Middleware and route name are scanned once from the declaration line
    /// and propagated to all six; the name is suffixed per action
    /// (`.index`, `.store`, `.show`, `.update` for both PUT and PATCH,
    /// `.destroy`).
    fn expand_resource(
        &self,
        base_path: &str,
        controller: &str,
        kind: DeclarationKind,
        line: &str,
        line_no: usize,
    ) -> Vec<RouteRecord> {
        let middlewares = self.annotations.middlewares(line);
        let base_name = self.annotations.route_name(line);

        RESOURCE_ACTIONS
            .iter()
            .map(|&(method, action, item_scoped)| {
                let (path, parameters) = if item_scoped {
                    (
                        format!("{}/{{id}}", base_path),
                        vec![RouteParameter::new("id", None)],
                    )
                } else {
                    (base_path.to_string(), Vec::new())
                };

                RouteRecord {
                    method,
                    path,
                    handler: Handler::Controller {
                        controller: controller.to_string(),
                        action: action.to_string(),
                    },
                    parameters,
                    middlewares: middlewares.clone(),
                    name: base_name.as_ref().map(|n| format!("{}.{}", n, action)),
                    source_line: line_no,
                    kind,
                }
            })
            .collect()
    }
}

impl Default for RouteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// A declaration is complete when it is terminated by a statement separator
/// or its parentheses balance (having opened at least one).
fn is_complete(text: &str) -> bool {
    if text.contains(';') {
        return true;
    }
    let opens = text.bytes().filter(|&b| b == b'(').count();
    let closes = text.bytes().filter(|&b| b == b')').count();
    opens > 0 && opens == closes
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(content: &str) -> Vec<RouteRecord> {
        RouteExtractor::new().extract(content)
    }

    #[test]
    fn test_controller_class_with_annotations() {
        let records = extract(
            "Route::get('/users/{id}', [UserController::class, 'show'])->middleware('auth')->name('users.show');",
        );

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.method, HttpMethod::Get);
        assert_eq!(record.path, "/users/{id}");
        assert_eq!(
            record.handler,
            Handler::Controller {
                controller: "UserController".to_string(),
                action: "show".to_string(),
            }
        );
        assert_eq!(record.parameters, vec![RouteParameter::new("id", None)]);
        assert_eq!(
            record.middlewares,
            BTreeSet::from(["auth".to_string()])
        );
        assert_eq!(record.name.as_deref(), Some("users.show"));
        assert_eq!(record.source_line, 1);
        assert_eq!(record.kind, DeclarationKind::ControllerClass);
    }

    #[test]
    fn test_controller_string_form() {
        let records = extract("Route::post('/login', 'AuthController@login');");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].method, HttpMethod::Post);
        assert_eq!(
            records[0].handler,
            Handler::Controller {
                controller: "AuthController".to_string(),
                action: "login".to_string(),
            }
        );
        assert_eq!(records[0].kind, DeclarationKind::ControllerString);
    }

    #[test]
    fn test_closure_form() {
        let records = extract("Route::get('/health', function () { return 'ok'; });");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].handler, Handler::Closure);
        assert_eq!(records[0].kind, DeclarationKind::Closure);
        assert!(records[0].parameters.is_empty());
    }

    #[test]
    fn test_api_resource_expands_to_six_records() {
        let records = extract("Route::apiResource('posts', PostController::class);");

        assert_eq!(records.len(), 6);

        let methods: Vec<HttpMethod> = records.iter().map(|r| r.method).collect();
        assert_eq!(
            methods,
            vec![
                HttpMethod::Get,
                HttpMethod::Post,
                HttpMethod::Get,
                HttpMethod::Put,
                HttpMethod::Patch,
                HttpMethod::Delete,
            ]
        );

        let actions: Vec<&str> = records
            .iter()
            .map(|r| match &r.handler {
                Handler::Controller { controller, action } => {
                    assert_eq!(controller, "PostController");
                    action.as_str()
                }
                Handler::Closure => panic!("resource routes always have a controller"),
            })
            .collect();
        assert_eq!(
            actions,
            vec!["index", "store", "show", "update", "update", "destroy"]
        );

        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "posts",
                "posts",
                "posts/{id}",
                "posts/{id}",
                "posts/{id}",
                "posts/{id}",
            ]
        );

        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.kind, DeclarationKind::ApiResource);
            assert_eq!(record.source_line, 1);
            assert!(record.middlewares.is_empty());
            assert_eq!(record.name, None);
            if i < 2 {
                assert!(record.parameters.is_empty());
            } else {
                assert_eq!(record.parameters, vec![RouteParameter::new("id", None)]);
            }
        }
    }

    #[test]
    fn test_resource_with_chained_name_and_middleware() {
        let records = extract(
            "Route::resource('patients', PatientController::class)->middleware(['auth', 'verified'])->name('patients');",
        );

        assert_eq!(records.len(), 6);
        let expected_middlewares =
            BTreeSet::from(["auth".to_string(), "verified".to_string()]);
        let names: Vec<Option<&str>> = records.iter().map(|r| r.name.as_deref()).collect();
        assert_eq!(
            names,
            vec![
                Some("patients.index"),
                Some("patients.store"),
                Some("patients.show"),
                Some("patients.update"),
                Some("patients.update"),
                Some("patients.destroy"),
            ]
        );
        for record in &records {
            assert_eq!(record.kind, DeclarationKind::Resource);
            assert_eq!(record.middlewares, expected_middlewares);
        }
    }

    #[test]
    fn test_comment_lines_yield_nothing() {
        let content = "\
// Route::get('/users', [UserController::class, 'index']);
# Route::post('/users', [UserController::class, 'store']);
    // indented comment with Route::delete('/users/{id}', [UserController::class, 'destroy']);
";
        assert!(extract(content).is_empty());
    }

    #[test]
    fn test_non_route_lines_are_ignored() {
        let content = "\
<?php

use App\\Http\\Controllers\\UserController;
use Illuminate\\Support\\Facades\\Route;

Route::get('/users', [UserController::class, 'index']);
";
        let records = extract(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].source_line, 6);
    }

    #[test]
    fn test_wildcard_verbs() {
        let records = extract(
            "Route::any('/fallback', 'FallbackController@handle');\n\
             Route::match('/either', 'EitherController@handle');",
        );
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].method, HttpMethod::Any);
        assert_eq!(records[1].method, HttpMethod::Match);
    }

    #[test]
    fn test_multi_line_declaration_accumulates() {
        let content = "\
Route::get(
    '/users/{id}',
    [UserController::class, 'show']
)->middleware('auth');
";
        let records = extract(content);

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.method, HttpMethod::Get);
        assert_eq!(record.path, "/users/{id}");
        assert_eq!(
            record.handler,
            Handler::Controller {
                controller: "UserController".to_string(),
                action: "show".to_string(),
            }
        );
        assert_eq!(record.middlewares, BTreeSet::from(["auth".to_string()]));
        // attributed to the line where accumulation began
        assert_eq!(record.source_line, 1);
    }

    #[test]
    fn test_multi_line_accumulation_skips_interleaved_comments() {
        let content = "\
Route::post(
    // request payload is validated in the controller
    '/appointments',
    [AppointmentController::class, 'store']
);
";
        let records = extract(content);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "/appointments");
        assert_eq!(records[0].source_line, 1);
    }

    #[test]
    fn test_extraction_order_follows_first_appearance() {
        let content = "\
Route::post('/login', 'AuthController@login');
Route::apiResource('posts', PostController::class);
Route::get('/health', function () { return 'ok'; });
";
        let records = extract(content);

        assert_eq!(records.len(), 8);
        assert_eq!(records[0].source_line, 1);
        // the six expanded records form a contiguous block
        for record in &records[1..7] {
            assert_eq!(record.source_line, 2);
            assert_eq!(record.kind, DeclarationKind::ApiResource);
        }
        assert_eq!(records[7].source_line, 3);
    }

    #[test]
    fn test_malformed_declaration_is_skipped() {
        // verb + path but no resolvable handler
        let records = extract("Route::get('/orphan', $somethingElse);");
        assert!(records.is_empty());
    }

    #[test]
    fn test_namespaced_controller_reference() {
        let records = extract(
            "Route::get('/admin/stats', [\\App\\Http\\Controllers\\Admin\\StatsController::class, 'index']);",
        );
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].handler,
            Handler::Controller {
                controller: "\\App\\Http\\Controllers\\Admin\\StatsController".to_string(),
                action: "index".to_string(),
            }
        );
    }
}
