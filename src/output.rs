//! CLI output formatting.
//!
//! # Project-First Display
//!
//! Output is grouped by project. Each project leads with its display name
//! and template count; file lines are indented beneath it with the template
//! path relative to the template root, so the listing reads the same way the
//! `templates/` tree looks on disk.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! ==> Building all projects (2)
//! TodoConta (3 templates)
//!     Source: projects/todoconta/templates
//!     welcome.mjml → welcome.html
//!     workshop/reminder.mjml → workshop/reminder.html
//!         Warning: Line 12 (mj-text) Attribute foo is illegal
//!     broken.mjml: failed
//!         Error: Malformed MJML
//!     2 compiled, 1 failed
//! acme: skipped
//!     Error: Template directory not found: projects/acme/templates
//!
//! ==> Build failed: 2 compiled, 1 failed, 1 project error
//! ```
//!
//! ## Check
//!
//! ```text
//! 001 TodoConta (2 templates)
//!     welcome.mjml
//!     workshop/reminder.mjml
//! 002 acme
//!     Error: Template directory not found: projects/acme/templates
//!
//! 2 templates in 2 projects
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::pipeline::{BuildEvent, BuildReport, ProjectInventory, Target, Tally};
use crate::registry::Project;
use crate::ses::SesTemplateFile;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 template`, `2 templates`.
fn count(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Forward slashes on every platform so output is stable.
fn display_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Per-project subtotal line: `2 compiled, 1 failed`.
fn tally_line(tally: &Tally) -> String {
    format!("{} compiled, {} failed", tally.success, tally.errors)
}

// ============================================================================
// Build
// ============================================================================

/// Format a single build progress event as display lines.
pub fn format_build_event(event: &BuildEvent) -> Vec<String> {
    match event {
        BuildEvent::BuildStarted {
            target,
            project_count,
        } => match target {
            Target::All => vec![format!("==> Building all projects ({project_count})")],
            Target::Project(id) => vec![format!("==> Building project {id}")],
        },
        BuildEvent::ProjectStarted {
            display_name,
            source_dir,
            template_count,
            ..
        } => vec![
            format!("{} ({})", display_name, count(*template_count, "template")),
            format!("{}Source: {}", indent(1), display_path(source_dir)),
        ],
        BuildEvent::ProjectFailed { name, reason } => vec![
            format!("{name}: skipped"),
            format!("{}Error: {}", indent(1), reason),
        ],
        BuildEvent::TemplateCompiled {
            relative_path,
            output_path,
            warnings,
        } => {
            let mut lines = vec![format!(
                "{}{} \u{2192} {}",
                indent(1),
                display_path(relative_path),
                display_path(output_path)
            )];
            lines.extend(
                warnings
                    .iter()
                    .map(|w| format!("{}Warning: {}", indent(2), w)),
            );
            lines
        }
        BuildEvent::TemplateFailed {
            relative_path,
            reason,
        } => {
            let mut lines = vec![format!("{}{}: failed", indent(1), display_path(relative_path))];
            // Compiler messages can span several lines.
            lines.extend(
                reason
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .enumerate()
                    .map(|(i, l)| {
                        if i == 0 {
                            format!("{}Error: {}", indent(2), l.trim_end())
                        } else {
                            format!("{}{}", indent(3), l.trim_end())
                        }
                    }),
            );
            lines
        }
        BuildEvent::ProjectFinished { tally, .. } => {
            vec![format!("{}{}", indent(1), tally_line(tally))]
        }
    }
}

/// Format the final global summary of a build.
pub fn format_build_summary(report: &BuildReport) -> Vec<String> {
    let total = &report.total;
    let mut summary = tally_line(total);
    if total.project_errors > 0 {
        summary.push_str(&format!(", {}", count(total.project_errors, "project error")));
    }
    let status = if report.succeeded() {
        "Build complete"
    } else {
        "Build failed"
    };
    vec![String::new(), format!("==> {status}: {summary}")]
}

pub fn print_build_summary(report: &BuildReport) {
    for line in format_build_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the template inventory found by `check`.
pub fn format_check_output(inventory: &[ProjectInventory]) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total = 0;

    for (i, project) in inventory.iter().enumerate() {
        match &project.templates {
            Ok(templates) => {
                total += templates.len();
                lines.push(format!(
                    "{} {} ({})",
                    format_index(i + 1),
                    project.display_name,
                    count(templates.len(), "template")
                ));
                let mut paths: Vec<String> = templates
                    .iter()
                    .map(|t| display_path(&t.relative_path))
                    .collect();
                paths.sort();
                lines.extend(paths.into_iter().map(|p| format!("{}{}", indent(1), p)));
            }
            Err(e) => {
                lines.push(format!("{} {}", format_index(i + 1), project.display_name));
                lines.push(format!("{}Error: {}", indent(1), e));
            }
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "{} in {}",
        count(total, "template"),
        count(inventory.len(), "project")
    ));
    lines
}

pub fn print_check_output(inventory: &[ProjectInventory]) {
    for line in format_check_output(inventory) {
        println!("{}", line);
    }
}

// ============================================================================
// Projects
// ============================================================================

/// Format the project listing: display name, id, and description if any.
pub fn format_project_list(projects: &[Project]) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, project) in projects.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), project.display_name));
        lines.push(format!("{}Id: {}", indent(1), project.id));
        if let Some(description) = project
            .meta
            .as_ref()
            .and_then(|m| m.description.as_deref())
            .filter(|d| !d.trim().is_empty())
        {
            lines.push(format!("{}Description: {}", indent(1), description.trim()));
        }
    }
    lines
}

pub fn print_project_list(projects: &[Project]) {
    for line in format_project_list(projects) {
        println!("{}", line);
    }
}

// ============================================================================
// SES
// ============================================================================

/// Format the result of `ses-template`, with the follow-up AWS command.
pub fn format_ses_output(file: &SesTemplateFile, root: &Path) -> Vec<String> {
    let relative = file.path.strip_prefix(root).unwrap_or(&file.path);
    vec![
        "SES template config created".to_string(),
        format!("{}Project: {}", indent(1), file.display_name),
        format!("{}Template: {}", indent(1), file.template_name),
        format!("{}Output: {}", indent(1), display_path(relative)),
        String::new(),
        "Next steps:".to_string(),
        format!(
            "{}aws ses create-template --cli-input-json file://{}",
            indent(1),
            display_path(&file.path)
        ),
    ]
}

pub fn print_ses_output(file: &SesTemplateFile, root: &Path) {
    for line in format_ses_output(file, root) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::{LocatorError, TemplateFile};
    use crate::pipeline::{ProjectError, ProjectReport};
    use crate::types::ProjectMeta;
    use std::path::PathBuf;

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1000), "1000");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn count_pluralizes() {
        assert_eq!(count(0, "template"), "0 templates");
        assert_eq!(count(1, "template"), "1 template");
        assert_eq!(count(2, "project error"), "2 project errors");
    }

    // =========================================================================
    // Build event tests
    // =========================================================================

    #[test]
    fn build_started_all() {
        let lines = format_build_event(&BuildEvent::BuildStarted {
            target: Target::All,
            project_count: 3,
        });
        assert_eq!(lines, vec!["==> Building all projects (3)"]);
    }

    #[test]
    fn build_started_single() {
        let lines = format_build_event(&BuildEvent::BuildStarted {
            target: Target::Project("todoconta".to_string()),
            project_count: 1,
        });
        assert_eq!(lines, vec!["==> Building project todoconta"]);
    }

    #[test]
    fn project_started_shows_count_and_source() {
        let lines = format_build_event(&BuildEvent::ProjectStarted {
            id: "todoconta".to_string(),
            display_name: "TodoConta".to_string(),
            source_dir: PathBuf::from("projects/todoconta/templates"),
            template_count: 1,
        });
        assert_eq!(
            lines,
            vec!["TodoConta (1 template)", "    Source: projects/todoconta/templates"]
        );
    }

    #[test]
    fn compiled_template_shows_arrow_and_warnings() {
        let lines = format_build_event(&BuildEvent::TemplateCompiled {
            relative_path: PathBuf::from("workshop/reminder.mjml"),
            output_path: PathBuf::from("workshop/reminder.html"),
            warnings: vec!["Line 12 (mj-text) Attribute foo is illegal".to_string()],
        });
        assert_eq!(lines[0], "    workshop/reminder.mjml \u{2192} workshop/reminder.html");
        assert_eq!(
            lines[1],
            "        Warning: Line 12 (mj-text) Attribute foo is illegal"
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn failed_template_shows_reason() {
        let lines = format_build_event(&BuildEvent::TemplateFailed {
            relative_path: PathBuf::from("broken.mjml"),
            reason: "Malformed MJML\n  at line 3\n".to_string(),
        });
        assert_eq!(
            lines,
            vec![
                "    broken.mjml: failed",
                "        Error: Malformed MJML",
                "              at line 3",
            ]
        );
    }

    #[test]
    fn project_failed_shows_reason() {
        let lines = format_build_event(&BuildEvent::ProjectFailed {
            name: "acme".to_string(),
            reason: "Template directory not found: projects/acme/templates".to_string(),
        });
        assert_eq!(lines[0], "acme: skipped");
        assert_eq!(
            lines[1],
            "    Error: Template directory not found: projects/acme/templates"
        );
    }

    #[test]
    fn project_finished_shows_subtotal() {
        let lines = format_build_event(&BuildEvent::ProjectFinished {
            display_name: "TodoConta".to_string(),
            tally: Tally {
                success: 2,
                errors: 1,
                project_errors: 0,
            },
        });
        assert_eq!(lines, vec!["    2 compiled, 1 failed"]);
    }

    // =========================================================================
    // Summary tests
    // =========================================================================

    fn report(total: Tally) -> BuildReport {
        BuildReport {
            projects: vec![ProjectReport {
                id: "acme".to_string(),
                display_name: "Acme".to_string(),
                output_root: PathBuf::from("dist/acme"),
                tally: total,
                error: None,
            }],
            total,
        }
    }

    #[test]
    fn summary_success() {
        let lines = format_build_summary(&report(Tally {
            success: 4,
            errors: 0,
            project_errors: 0,
        }));
        assert_eq!(lines[1], "==> Build complete: 4 compiled, 0 failed");
    }

    #[test]
    fn summary_failure_includes_project_errors() {
        let lines = format_build_summary(&report(Tally {
            success: 2,
            errors: 1,
            project_errors: 1,
        }));
        assert_eq!(
            lines[1],
            "==> Build failed: 2 compiled, 1 failed, 1 project error"
        );
    }

    #[test]
    fn summary_project_errors_alone_fail() {
        let lines = format_build_summary(&report(Tally {
            success: 0,
            errors: 0,
            project_errors: 2,
        }));
        assert!(lines[1].starts_with("==> Build failed"));
    }

    // =========================================================================
    // Check tests
    // =========================================================================

    fn template(rel: &str) -> TemplateFile {
        TemplateFile {
            path: PathBuf::from("/ws/projects/p/templates").join(rel),
            relative_path: PathBuf::from(rel),
        }
    }

    #[test]
    fn check_output_lists_sorted_templates_and_errors() {
        let inventory = vec![
            ProjectInventory {
                id: "todoconta".to_string(),
                display_name: "TodoConta".to_string(),
                templates: Ok(vec![template("workshop/reminder.mjml"), template("welcome.mjml")]),
            },
            ProjectInventory {
                id: "acme".to_string(),
                display_name: "acme".to_string(),
                templates: Err(ProjectError::Templates(LocatorError::RootNotFound(
                    PathBuf::from("projects/acme/templates"),
                ))),
            },
        ];

        let lines = format_check_output(&inventory);
        assert_eq!(
            lines,
            vec![
                "001 TodoConta (2 templates)",
                "    welcome.mjml",
                "    workshop/reminder.mjml",
                "002 acme",
                "    Error: Template directory not found: projects/acme/templates",
                "",
                "2 templates in 2 projects",
            ]
        );
    }

    #[test]
    fn check_output_empty() {
        let lines = format_check_output(&[]);
        assert_eq!(lines, vec!["", "0 templates in 0 projects"]);
    }

    // =========================================================================
    // Project list tests
    // =========================================================================

    fn project(id: &str, display_name: &str, description: Option<&str>) -> Project {
        Project {
            id: id.to_string(),
            display_name: display_name.to_string(),
            template_root: PathBuf::from("projects").join(id).join("templates"),
            output_root: PathBuf::from("dist").join(id),
            meta: description.map(|d| ProjectMeta {
                description: Some(d.to_string()),
                ..ProjectMeta::default()
            }),
        }
    }

    #[test]
    fn project_list_with_and_without_description() {
        let lines = format_project_list(&[
            project("todoconta", "TodoConta", Some("Accounting workshops")),
            project("acme", "acme", None),
        ]);
        assert_eq!(
            lines,
            vec![
                "001 TodoConta",
                "    Id: todoconta",
                "    Description: Accounting workshops",
                "002 acme",
                "    Id: acme",
            ]
        );
    }

    // =========================================================================
    // SES tests
    // =========================================================================

    #[test]
    fn ses_output_shows_relative_path_and_command() {
        let file = SesTemplateFile {
            path: PathBuf::from("/ws/projects/todoconta/docs/ses-welcome.json"),
            template_name: "todoconta-welcome".to_string(),
            display_name: "TodoConta".to_string(),
        };
        let lines = format_ses_output(&file, Path::new("/ws"));
        assert_eq!(lines[0], "SES template config created");
        assert_eq!(lines[1], "    Project: TodoConta");
        assert_eq!(lines[2], "    Template: todoconta-welcome");
        assert_eq!(lines[3], "    Output: projects/todoconta/docs/ses-welcome.json");
        assert_eq!(
            lines[6],
            "    aws ses create-template --cli-input-json file:///ws/projects/todoconta/docs/ses-welcome.json"
        );
    }
}
