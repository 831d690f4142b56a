//! Compiler adapter.
//!
//! Turns one template into a [`CompileOutcome`]. Whatever goes wrong inside
//! the transform (a crash, an unreadable file, invalid output) becomes
//! `Failure` with a readable reason; structural warnings reported under soft
//! validation ride along with a `Success`. Nothing here panics or returns
//! early, so the caller can count exactly one outcome per file.
//!
//! - **Transform**: [`Transform`] trait, options and profile overrides
//! - **MjmlCli**: the `mjml` command-line compiler as a [`Transform`]

pub mod mjml_cli;
pub mod transform;

pub use mjml_cli::MjmlCli;
pub use transform::{
    OptionOverrides, Transform, TransformError, TransformMessage, TransformOptions,
    TransformOutput,
};

use crate::locate::TemplateFile;
use std::fs;
use std::path::Path;

/// Normalized result of compiling one template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileOutcome {
    Success { html: String, warnings: Vec<String> },
    Failure { reason: String },
}

impl CompileOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CompileOutcome::Success { .. })
    }
}

/// Compile source text with `transform`.
pub fn compile(
    transform: &impl Transform,
    source: &str,
    source_path: &Path,
    options: &TransformOptions,
) -> CompileOutcome {
    match transform.transform(source, source_path, options) {
        Ok(output) => CompileOutcome::Success {
            html: output.html,
            warnings: output
                .errors
                .into_iter()
                .map(|e| e.formatted_message)
                .collect(),
        },
        Err(e) => CompileOutcome::Failure {
            reason: e.to_string(),
        },
    }
}

/// Read a template from disk and compile it.
///
/// A file that cannot be read as UTF-8 text is a `Failure`, same as a
/// transform error.
pub fn compile_file(
    transform: &impl Transform,
    file: &TemplateFile,
    options: &TransformOptions,
) -> CompileOutcome {
    match fs::read_to_string(&file.path) {
        Ok(source) => compile(transform, &source, &file.path, options),
        Err(e) => CompileOutcome::Failure {
            reason: format!("Cannot read {}: {}", file.relative_path.display(), e),
        },
    }
}
