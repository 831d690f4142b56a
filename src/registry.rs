//! Project discovery and metadata loading.
//!
//! A workspace holds any number of independent projects, one directory each:
//!
//! ```text
//! projects/
//! ├── todoconta/
//! │   ├── config/project.json      # Metadata (optional)
//! │   ├── components/              # Include targets, never compiled
//! │   └── templates/               # Template root
//! │       ├── transactional/
//! │       │   └── welcome.mjml
//! │       └── newsletter/
//! │           └── march.mjml
//! └── despacho-contable/
//!     └── templates/
//!         └── invoice.mjml
//! ```
//!
//! The project identifier is the directory name. Projects are discovered at
//! the start of every run and never cached between runs.

use crate::config::{LayoutConfig, StudioConfig};
use crate::types::ProjectMeta;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Projects directory not found: {0}")]
    RootNotFound(PathBuf),
    #[error("Projects path is not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot read metadata {path}: {source}")]
    MetadataIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid metadata {path}: {source}")]
    Metadata {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Resolved directory layout of one workspace.
///
/// Built once from the root directory and the [`StudioConfig`]; every path the
/// pipeline touches is derived from here so no code joins path strings by hand.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    projects_dir: PathBuf,
    output_dir: PathBuf,
    layout: LayoutConfig,
}

impl Workspace {
    pub fn new(root: &Path, config: &StudioConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            projects_dir: root.join(&config.projects_dir),
            output_dir: root.join(&config.output_dir),
            layout: config.layout.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn template_extension(&self) -> &str {
        &self.layout.template_extension
    }

    pub fn project_dir(&self, id: &str) -> PathBuf {
        self.projects_dir.join(id)
    }

    pub fn template_root(&self, id: &str) -> PathBuf {
        self.project_dir(id).join(&self.layout.templates_dir)
    }

    /// Output root of a project: `<output_dir>/<id>`.
    pub fn output_root(&self, id: &str) -> PathBuf {
        self.output_dir.join(id)
    }

    pub fn metadata_path(&self, id: &str) -> PathBuf {
        self.project_dir(id).join(&self.layout.metadata_file)
    }

    pub fn docs_dir(&self, id: &str) -> PathBuf {
        self.project_dir(id).join(&self.layout.docs_dir)
    }
}

/// A project resolved for one run. Immutable once loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub display_name: String,
    pub template_root: PathBuf,
    pub output_root: PathBuf,
    /// Parsed metadata; `None` when the project has no metadata file.
    pub meta: Option<ProjectMeta>,
}

/// List project identifiers: every non-hidden subdirectory of `projects_dir`.
///
/// Sorted by name so repeated runs report projects in the same order.
pub fn list_projects(projects_dir: &Path) -> Result<Vec<String>, RegistryError> {
    if !projects_dir.exists() {
        return Err(RegistryError::RootNotFound(projects_dir.to_path_buf()));
    }
    if !projects_dir.is_dir() {
        return Err(RegistryError::NotADirectory(projects_dir.to_path_buf()));
    }

    let mut ids = Vec::new();
    for entry in fs::read_dir(projects_dir)? {
        let entry = entry?;
        if !entry.path().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with('.') {
            ids.push(name);
        }
    }

    ids.sort();
    debug!(count = ids.len(), dir = %projects_dir.display(), "listed projects");
    Ok(ids)
}

/// Load a project's metadata and resolve its paths.
///
/// A missing metadata file is not an error: the project is returned with its
/// identifier as display name and a warning is logged. A metadata file that
/// exists but does not parse is [`RegistryError::Metadata`].
pub fn load_project_meta(workspace: &Workspace, id: &str) -> Result<Project, RegistryError> {
    let meta_path = workspace.metadata_path(id);

    let meta = if meta_path.is_file() {
        let content = fs::read_to_string(&meta_path).map_err(|source| RegistryError::MetadataIo {
            path: meta_path.clone(),
            source,
        })?;
        let meta: ProjectMeta =
            serde_json::from_str(&content).map_err(|source| RegistryError::Metadata {
                path: meta_path.clone(),
                source,
            })?;
        Some(meta)
    } else {
        warn!(project = id, "no metadata file found, using the project id as display name");
        None
    };

    let display_name = meta
        .as_ref()
        .and_then(|m| m.display_name.as_deref())
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(id)
        .to_string();

    Ok(Project {
        id: id.to_string(),
        display_name,
        template_root: workspace.template_root(id),
        output_root: workspace.output_root(id),
        meta,
    })
}
