//! Transform trait and shared types.
//!
//! The [`Transform`] trait is the seam between the build pipeline and the
//! markup-to-HTML compiler. The pipeline only relies on its contract:
//!
//! - malformed but parseable input never errors; structural problems come
//!   back as `errors` next to the HTML (soft validation),
//! - unrecoverable problems (unreadable input, a crashed compiler) are a
//!   [`TransformError`],
//! - `source_path` is only used to resolve relative includes.
//!
//! The production implementation is [`MjmlCli`](super::mjml_cli::MjmlCli).

use crate::config::{StudioConfig, ValidationLevel};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compiler output is not valid UTF-8: {0}")]
    Output(#[from] std::string::FromUtf8Error),
    #[error("Cannot encode compiler options: {0}")]
    Options(#[from] serde_json::Error),
    #[error("{message}")]
    Failed { message: String },
}

/// One diagnostic reported by the transform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformMessage {
    pub formatted_message: String,
}

/// Raw transform result, before normalization into a
/// [`CompileOutcome`](super::CompileOutcome).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub html: String,
    pub errors: Vec<TransformMessage>,
}

/// Options handed to the transform for one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOptions {
    pub minify: bool,
    pub beautify: bool,
    pub validation_level: ValidationLevel,
    /// Font family → stylesheet URL.
    pub fonts: BTreeMap<String, String>,
}

/// Per-call overrides. `Some` wins over the configured default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptionOverrides {
    pub minify: Option<bool>,
    pub beautify: Option<bool>,
    pub validation_level: Option<ValidationLevel>,
}

impl OptionOverrides {
    /// The profile every build compiles with, whatever the global defaults say.
    pub const BUILD: Self = Self {
        minify: Some(true),
        beautify: Some(false),
        validation_level: Some(ValidationLevel::Soft),
    };
}

impl TransformOptions {
    /// Global defaults from `[compiler]` and `[fonts]`.
    pub fn from_config(config: &StudioConfig) -> Self {
        Self {
            minify: config.compiler.minify,
            beautify: config.compiler.beautify,
            validation_level: config.compiler.validation_level,
            fonts: config.fonts.clone(),
        }
    }

    pub fn with_overrides(self, overrides: &OptionOverrides) -> Self {
        Self {
            minify: overrides.minify.unwrap_or(self.minify),
            beautify: overrides.beautify.unwrap_or(self.beautify),
            validation_level: overrides.validation_level.unwrap_or(self.validation_level),
            fonts: self.fonts,
        }
    }

    /// Configured defaults with [`OptionOverrides::BUILD`] applied.
    pub fn build_profile(config: &StudioConfig) -> Self {
        Self::from_config(config).with_overrides(&OptionOverrides::BUILD)
    }
}

/// Markup-to-HTML compiler.
pub trait Transform {
    /// Compile one template's source text.
    fn transform(
        &self,
        source: &str,
        source_path: &Path,
        options: &TransformOptions,
    ) -> Result<TransformOutput, TransformError>;
}
