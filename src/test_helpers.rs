//! Shared test utilities.
//!
//! [`StudioFixture`] builds a throwaway workspace in a temp directory:
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let fixture = StudioFixture::new()
//!     .template("todoconta", "transactional/welcome.mjml", "<mjml/>")
//!     .metadata("todoconta", r#"{"displayName": "TodoConta"}"#);
//!
//! let report = build(fixture.workspace(), fixture.config(), &Target::All, &mock, None).unwrap();
//! assert_eq!(fixture.read_output("todoconta", "transactional/welcome.html"), "...");
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::StudioConfig;
use crate::registry::Workspace;

/// Temp workspace with stock config. Dropped with the temp directory.
pub struct StudioFixture {
    _tmp: TempDir,
    config: StudioConfig,
    workspace: Workspace,
}

impl StudioFixture {
    pub fn new() -> Self {
        Self::with_config(StudioConfig::default())
    }

    pub fn with_config(config: StudioConfig) -> Self {
        let tmp = TempDir::new().unwrap();
        let workspace = Workspace::new(tmp.path(), &config);
        Self {
            _tmp: tmp,
            config,
            workspace,
        }
    }

    /// Write a template at `relative` under the project's template root.
    pub fn template(self, project: &str, relative: &str, content: &str) -> Self {
        let path = self.workspace.template_root(project).join(relative);
        write_file(&path, content.as_bytes());
        self
    }

    /// Write the project's metadata file.
    pub fn metadata(self, project: &str, json: &str) -> Self {
        write_file(&self.workspace.metadata_path(project), json.as_bytes());
        self
    }

    /// Create a project directory with no template root.
    pub fn bare_project(self, project: &str) -> Self {
        fs::create_dir_all(self.workspace.project_dir(project)).unwrap();
        self
    }

    /// Write an arbitrary file relative to the workspace root.
    pub fn file(self, relative: &str, content: &[u8]) -> Self {
        write_file(&self.workspace.root().join(relative), content);
        self
    }

    pub fn config(&self) -> &StudioConfig {
        &self.config
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Path of an output file: `dist/<project>/<relative>`.
    pub fn output(&self, project: &str, relative: &str) -> PathBuf {
        self.workspace.output_root(project).join(relative)
    }

    /// Read an output file. Panics with the missing path on failure.
    pub fn read_output(&self, project: &str, relative: &str) -> String {
        let path = self.output(project, relative);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read output {}: {e}", path.display()))
    }
}

fn write_file(path: &Path, content: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}
