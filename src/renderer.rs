//! Rendering of a [`RouteReport`] into its three output formats.
//!
//! The renderers return in-memory strings and are deterministic for a given
//! report; [`write_to_file`] is the only function here that touches the
//! filesystem. Rendering never fails for records produced by the extractor.

use crate::error::Result;
use crate::extractor::{DeclarationKind, HttpMethod};
use crate::report::RouteReport;
use log::debug;
use std::fs;
use std::path::Path;

const RULE: &str = "================================================================================";
const THIN_RULE: &str =
    "--------------------------------------------------------------------------------";

/// Renders the plain-text report: routes grouped by method in the fixed
/// report ordering, one fixed-width line per route, followed by a trailer
/// with count-by-kind and count-by-method summaries.
pub fn render_text(report: &RouteReport) -> String {
    let mut out = String::new();

    out.push_str(RULE);
    out.push('\n');
    out.push_str(&format!("Routes extracted from {}\n", report.repository));
    out.push_str(&format!("File: {}\n", report.file));
    out.push_str(&format!("Total routes: {}\n", report.total_routes));
    out.push_str(RULE);
    out.push('\n');

    for method in HttpMethod::REPORT_ORDER {
        let routes = report.routes_for(method);
        if routes.is_empty() {
            continue;
        }

        out.push('\n');
        out.push_str(&format!("{} routes ({})\n", method, routes.len()));
        out.push_str(THIN_RULE);
        out.push('\n');
        for route in routes {
            out.push_str(&format!(
                "{:<8} {:<42} {:<38} line {}\n",
                route.method, route.path, route.handler, route.source_line
            ));
        }
    }

    out.push('\n');
    out.push_str(RULE);
    out.push('\n');
    out.push_str("Routes by kind:\n");
    for kind in DeclarationKind::REPORT_ORDER {
        let count = report.count_for_kind(kind);
        if count > 0 {
            out.push_str(&format!("  {}: {}\n", kind.as_str(), count));
        }
    }
    out.push_str("Routes by method:\n");
    for method in HttpMethod::REPORT_ORDER {
        let count = report.count_for_method(method);
        if count > 0 {
            out.push_str(&format!("  {}: {}\n", method, count));
        }
    }

    out
}

/// Serializes the report to pretty-printed JSON. Every record field is
/// present, so deserializing the output reproduces the record list exactly.
pub fn serialize_json(report: &RouteReport) -> Result<String> {
    debug!("Serializing report to JSON");
    Ok(serde_json::to_string_pretty(report)?)
}

/// Renders the Markdown report: one section per method in the fixed report
/// ordering, one subsection per route.
pub fn render_markdown(report: &RouteReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("# API Routes - {}\n\n", report.repository));
    out.push_str(&format!("**File:** `{}`\n\n", report.file));
    out.push_str(&format!("**Total routes:** {}\n\n", report.total_routes));
    out.push_str("---\n\n");

    for method in HttpMethod::REPORT_ORDER {
        let routes = report.routes_for(method);
        if routes.is_empty() {
            continue;
        }

        out.push_str(&format!("## {} Routes\n\n", method));
        for route in routes {
            out.push_str(&format!("### {}\n\n", route.path));
            out.push_str(&format!("- **Method:** `{}`\n", route.method));
            out.push_str(&format!("- **Handler:** `{}`\n", route.handler));

            if !route.parameters.is_empty() {
                out.push_str("- **Parameters:**\n");
                for param in &route.parameters {
                    match &param.constraint {
                        Some(constraint) => out.push_str(&format!(
                            "  - `${}` (constraint: `{}`)\n",
                            param.name, constraint
                        )),
                        None => out.push_str(&format!("  - `${}`\n", param.name)),
                    }
                }
            }

            if !route.middlewares.is_empty() {
                let tokens: Vec<&str> = route.middlewares.iter().map(String::as_str).collect();
                out.push_str(&format!("- **Middlewares:** `{}`\n", tokens.join(", ")));
            }

            if let Some(name) = &route.name {
                out.push_str(&format!("- **Name:** `{}`\n", name));
            }

            out.push_str(&format!("- **Line:** {}\n\n", route.source_line));
            out.push_str("---\n\n");
        }
    }

    out
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing {} bytes to {}", content.len(), path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::RouteExtractor;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_report() -> RouteReport {
        let content = "\
Route::post('/login', 'AuthController@login')->name('auth.login');
Route::get('/users/{id}', [UserController::class, 'show'])->middleware('auth')->name('users.show');
Route::delete('/users/{id}', [UserController::class, 'destroy'])->middleware(['auth', 'admin']);
Route::get('/posts/{slug:[a-z-]+}', 'PostController@show');
";
        let routes = RouteExtractor::new().extract(content);
        RouteReport::new(
            "acme/backend".to_string(),
            "routes/api.php".to_string(),
            routes,
        )
    }

    #[test]
    fn test_text_groups_methods_in_fixed_order() {
        let text = render_text(&sample_report());

        let get_pos = text.find("GET routes").expect("GET section present");
        let post_pos = text.find("POST routes").expect("POST section present");
        let delete_pos = text.find("DELETE routes").expect("DELETE section present");

        // GET before POST before DELETE, regardless of input order
        assert!(get_pos < post_pos);
        assert!(post_pos < delete_pos);
    }

    #[test]
    fn test_text_lines_carry_method_path_handler_and_line() {
        let text = render_text(&sample_report());
        let line = text
            .lines()
            .find(|l| l.contains("/login"))
            .expect("POST entry present");

        assert!(line.starts_with("POST"));
        assert!(line.contains("AuthController::login"));
        assert!(line.contains("line 1"));
    }

    #[test]
    fn test_text_trailer_summaries() {
        let text = render_text(&sample_report());

        assert!(text.contains("Routes by kind:"));
        assert!(text.contains("  controller_class: 2"));
        assert!(text.contains("  controller_string: 2"));
        assert!(text.contains("Routes by method:"));
        assert!(text.contains("  GET: 2"));
        assert!(text.contains("  POST: 1"));
        assert!(text.contains("  DELETE: 1"));
    }

    #[test]
    fn test_text_omits_empty_method_groups() {
        let text = render_text(&sample_report());
        assert!(!text.contains("PATCH routes"));
        assert!(!text.contains("OPTIONS routes"));
    }

    #[test]
    fn test_json_roundtrip_is_lossless() {
        let report = sample_report();
        let json = serialize_json(&report).unwrap();
        let deserialized: RouteReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, report);
    }

    #[test]
    fn test_json_carries_source_metadata() {
        let json = serialize_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["repository"], "acme/backend");
        assert_eq!(value["file"], "routes/api.php");
        assert_eq!(value["total_routes"], 4);
        assert_eq!(value["routes"].as_array().unwrap().len(), 4);
        assert_eq!(value["routes"][0]["method"], "POST");
        assert_eq!(value["routes"][0]["handler"]["type"], "controller");
    }

    #[test]
    fn test_markdown_sections_and_fields() {
        let md = render_markdown(&sample_report());

        assert!(md.starts_with("# API Routes - acme/backend"));
        assert!(md.contains("**File:** `routes/api.php`"));
        assert!(md.contains("## GET Routes"));
        assert!(md.contains("## POST Routes"));
        assert!(md.contains("### /users/{id}"));
        assert!(md.contains("- **Handler:** `UserController::show`"));
        assert!(md.contains("- **Parameters:**"));
        assert!(md.contains("  - `$id`"));
        assert!(md.contains("- **Middlewares:** `auth`"));
        assert!(md.contains("- **Name:** `users.show`"));
    }

    #[test]
    fn test_markdown_renders_constraints() {
        let md = render_markdown(&sample_report());
        assert!(md.contains("  - `$slug` (constraint: `[a-z-]+`)"));
    }

    #[test]
    fn test_write_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("extracted_routes.txt");

        write_to_file("test content", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "test content");
    }

    #[test]
    fn test_write_to_file_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested").join("extracted_routes.md");

        write_to_file("# report", &file_path).unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "# report");
    }
}
