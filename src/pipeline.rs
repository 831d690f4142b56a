//! Build orchestration.
//!
//! Drives one run of the pipeline:
//!
//! ```text
//! resolve targets ─┬─ project 1 ─ locate ─┬─ compile ─ write ─ tally
//!                  │                       ├─ compile ─ write ─ tally
//!                  │                       └─ ...
//!                  ├─ project 2 ─ ...
//!                  └─ sum tallies ─ exit status
//! ```
//!
//! ## Failure Scopes
//!
//! Errors are absorbed at the narrowest scope that still lets the run make
//! progress:
//!
//! | Failure | Scope | Effect |
//! |---------|-------|--------|
//! | Projects dir missing, unknown `--project` | run | [`BuildError`], nothing is compiled |
//! | Template root missing, walk error, bad metadata | project | `project_errors += 1`, next project |
//! | Transform error, unreadable source, write error | file | `errors += 1`, next file |
//! | Soft-validation warnings | none | reported, not counted |
//!
//! The run succeeds only when both `errors` and `project_errors` are zero.
//!
//! ## Ordering
//!
//! Projects and templates are processed one at a time on the calling thread.
//! Tallies are plain counters owned by this module; progress leaves through
//! an optional channel in processing order.

use crate::compiler::{self, CompileOutcome, Transform, TransformOptions};
use crate::config::StudioConfig;
use crate::locate::{self, LocatorError, TemplateFile};
use crate::registry::{self, RegistryError, Workspace};
use crate::writer::{self, HTML_EXTENSION};
use std::ops::AddAssign;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::debug;

/// Errors that stop the run before anything is compiled.
#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Project \"{0}\" not found")]
    ProjectNotFound(String),
    #[error("Invalid project id \"{0}\"")]
    InvalidProjectId(String),
}

/// Errors that stop one project but not the run.
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error(transparent)]
    Templates(#[from] LocatorError),
    #[error(transparent)]
    Metadata(#[from] RegistryError),
}

/// Which projects a run covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    All,
    Project(String),
}

impl Target {
    /// `None` (no `--project` flag) means every project.
    pub fn from_option(project: Option<String>) -> Self {
        match project {
            Some(id) => Target::Project(id),
            None => Target::All,
        }
    }
}

/// Success and error counters for one project or the whole run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Templates compiled and written.
    pub success: usize,
    /// Templates that failed to compile or write.
    pub errors: usize,
    /// Projects that could not be processed at all.
    pub project_errors: usize,
}

impl Tally {
    /// Templates that produced an outcome (`success + errors`).
    pub fn processed(&self) -> usize {
        self.success + self.errors
    }

    pub fn failed(&self) -> bool {
        self.errors > 0 || self.project_errors > 0
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, other: Self) {
        self.success += other.success;
        self.errors += other.errors;
        self.project_errors += other.project_errors;
    }
}

/// Outcome of one project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReport {
    pub id: String,
    pub display_name: String,
    pub output_root: PathBuf,
    pub tally: Tally,
    /// Why the project was skipped, if it was.
    pub error: Option<String>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub projects: Vec<ProjectReport>,
    pub total: Tally,
}

impl BuildReport {
    /// True iff no file and no project failed. Maps to exit code 0.
    pub fn succeeded(&self) -> bool {
        !self.total.failed()
    }
}

/// Progress events, sent in processing order.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildEvent {
    BuildStarted {
        target: Target,
        project_count: usize,
    },
    ProjectStarted {
        id: String,
        display_name: String,
        /// Template root relative to the workspace root.
        source_dir: PathBuf,
        template_count: usize,
    },
    /// The project was skipped; `name` is the display name when known.
    ProjectFailed { name: String, reason: String },
    TemplateCompiled {
        relative_path: PathBuf,
        /// Output path relative to the project's output root.
        output_path: PathBuf,
        warnings: Vec<String>,
    },
    TemplateFailed {
        relative_path: PathBuf,
        reason: String,
    },
    ProjectFinished { display_name: String, tally: Tally },
}

/// Templates found for one project by [`check`].
#[derive(Debug)]
pub struct ProjectInventory {
    pub id: String,
    pub display_name: String,
    pub templates: Result<Vec<TemplateFile>, ProjectError>,
}

fn emit(events: Option<&Sender<BuildEvent>>, event: BuildEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Project ids are plain, non-hidden directory names, the same ones
/// [`registry::list_projects`] reports.
fn is_valid_project_id(id: &str) -> bool {
    !id.trim().is_empty() && !id.starts_with('.') && !id.contains(['/', '\\'])
}

/// Turn a [`Target`] into the list of project ids to process.
///
/// A named project must exist as a directory under the projects root.
pub fn resolve_targets(workspace: &Workspace, target: &Target) -> Result<Vec<String>, BuildError> {
    match target {
        Target::All => Ok(registry::list_projects(workspace.projects_dir())?),
        Target::Project(id) => {
            if !is_valid_project_id(id) {
                return Err(BuildError::InvalidProjectId(id.clone()));
            }
            let projects_dir = workspace.projects_dir();
            if !projects_dir.is_dir() {
                return Err(RegistryError::RootNotFound(projects_dir.to_path_buf()).into());
            }
            if !workspace.project_dir(id).is_dir() {
                return Err(BuildError::ProjectNotFound(id.clone()));
            }
            Ok(vec![id.clone()])
        }
    }
}

/// Run the build for `target`.
///
/// Returns `Err` only for configuration problems found before any work
/// starts. Everything after that is recorded in the [`BuildReport`].
pub fn build(
    workspace: &Workspace,
    config: &StudioConfig,
    target: &Target,
    transform: &impl Transform,
    events: Option<Sender<BuildEvent>>,
) -> Result<BuildReport, BuildError> {
    let ids = resolve_targets(workspace, target)?;
    let options = TransformOptions::build_profile(config);
    let events = events.as_ref();

    emit(
        events,
        BuildEvent::BuildStarted {
            target: target.clone(),
            project_count: ids.len(),
        },
    );

    let mut report = BuildReport::default();
    for id in &ids {
        let project = build_project(workspace, id, transform, &options, events);
        report.total += project.tally;
        report.projects.push(project);
    }

    debug!(
        success = report.total.success,
        errors = report.total.errors,
        project_errors = report.total.project_errors,
        "build finished"
    );
    Ok(report)
}

fn build_project(
    workspace: &Workspace,
    id: &str,
    transform: &impl Transform,
    options: &TransformOptions,
    events: Option<&Sender<BuildEvent>>,
) -> ProjectReport {
    let project = match registry::load_project_meta(workspace, id) {
        Ok(project) => project,
        Err(e) => {
            return skip_project(id, id, workspace.output_root(id), e.into(), events);
        }
    };

    let mut files =
        match locate::find_templates(&project.template_root, workspace.template_extension()) {
            Ok(files) => files,
            Err(e) => {
                return skip_project(
                    id,
                    &project.display_name,
                    project.output_root,
                    e.into(),
                    events,
                );
            }
        };
    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

    emit(
        events,
        BuildEvent::ProjectStarted {
            id: id.to_string(),
            display_name: project.display_name.clone(),
            source_dir: relative_to(&project.template_root, workspace.root()),
            template_count: files.len(),
        },
    );

    let mut tally = Tally::default();
    for file in &files {
        let event = match compiler::compile_file(transform, file, options) {
            CompileOutcome::Success { html, warnings } => {
                match writer::write(&project.output_root, &file.relative_path, &html) {
                    Ok(_) => {
                        tally.success += 1;
                        BuildEvent::TemplateCompiled {
                            relative_path: file.relative_path.clone(),
                            output_path: file.relative_path.with_extension(HTML_EXTENSION),
                            warnings,
                        }
                    }
                    Err(e) => {
                        tally.errors += 1;
                        BuildEvent::TemplateFailed {
                            relative_path: file.relative_path.clone(),
                            reason: e.to_string(),
                        }
                    }
                }
            }
            CompileOutcome::Failure { reason } => {
                tally.errors += 1;
                BuildEvent::TemplateFailed {
                    relative_path: file.relative_path.clone(),
                    reason,
                }
            }
        };
        emit(events, event);
    }

    emit(
        events,
        BuildEvent::ProjectFinished {
            display_name: project.display_name.clone(),
            tally,
        },
    );

    ProjectReport {
        id: id.to_string(),
        display_name: project.display_name,
        output_root: project.output_root,
        tally,
        error: None,
    }
}

fn skip_project(
    id: &str,
    name: &str,
    output_root: PathBuf,
    error: ProjectError,
    events: Option<&Sender<BuildEvent>>,
) -> ProjectReport {
    let reason = error.to_string();
    debug!(project = id, %reason, "project skipped");
    emit(
        events,
        BuildEvent::ProjectFailed {
            name: name.to_string(),
            reason: reason.clone(),
        },
    );
    ProjectReport {
        id: id.to_string(),
        display_name: name.to_string(),
        output_root,
        tally: Tally {
            project_errors: 1,
            ..Tally::default()
        },
        error: Some(reason),
    }
}

/// Enumerate templates for `target` without compiling anything.
pub fn check(workspace: &Workspace, target: &Target) -> Result<Vec<ProjectInventory>, BuildError> {
    let ids = resolve_targets(workspace, target)?;
    Ok(ids
        .into_iter()
        .map(|id| match registry::load_project_meta(workspace, &id) {
            Ok(project) => ProjectInventory {
                templates: locate::find_templates(
                    &project.template_root,
                    workspace.template_extension(),
                )
                .map_err(ProjectError::from),
                display_name: project.display_name,
                id,
            },
            Err(e) => ProjectInventory {
                display_name: id.clone(),
                id,
                templates: Err(e.into()),
            },
        })
        .collect())
}

fn relative_to(path: &Path, base: &Path) -> PathBuf {
    path.strip_prefix(base).unwrap_or(path).to_path_buf()
}
