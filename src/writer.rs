//! Output placement and persistence.
//!
//! Output mirrors the template tree under the project's output root, with the
//! template extension swapped for `.html`:
//!
//! ```text
//! projects/todoconta/templates/transactional/welcome.mjml
//!   → dist/todoconta/transactional/welcome.html
//! ```
//!
//! Builds are not incremental: every run rewrites every output file.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extension of compiled output files.
pub const HTML_EXTENSION: &str = "html";

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Cannot create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Destination of a template: `output_root/relative` with an `.html` extension.
pub fn output_path(output_root: &Path, relative: &Path) -> PathBuf {
    output_root.join(relative).with_extension(HTML_EXTENSION)
}

/// Write compiled HTML for the template at `relative`.
///
/// Creates missing parent directories and overwrites any existing file.
/// Returns the path written.
pub fn write(output_root: &Path, relative: &Path, html: &str) -> Result<PathBuf, WriteError> {
    let path = output_path(output_root, relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| WriteError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(&path, html).map_err(|source| WriteError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
