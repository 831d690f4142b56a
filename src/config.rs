//! Studio configuration module.
//!
//! Handles loading, validating, and merging `studio.toml`. The file is
//! optional; when present it sits in the workspace root and overrides the
//! stock defaults key by key.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! projects_dir = "projects"   # One subdirectory per project
//! output_dir = "dist"         # Compiled HTML lands in dist/<project>/
//!
//! [layout]
//! templates_dir = "templates"             # Template root inside each project
//! metadata_file = "config/project.json"   # Optional per-project metadata
//! docs_dir = "docs"                       # Where SES template JSON is written
//! template_extension = "mjml"
//!
//! [compiler]
//! command = "mjml"            # Transform executable
//! args = []                   # Extra arguments placed before the generated ones
//! minify = false              # Global defaults; `build` always overrides
//! beautify = true             # these three with minify=true, beautify=false,
//! validation_level = "soft"   # validation_level="soft"
//!
//! [fonts]
//! Inter = "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800&display=swap"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want.
//!
//! ```toml
//! output_dir = "build/html"
//!
//! [compiler]
//! command = "./node_modules/.bin/mjml"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the workspace configuration.
pub const CONFIG_FILENAME: &str = "studio.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Workspace configuration loaded from `studio.toml`.
///
/// Loaded once at startup and shared by reference for the whole run; nothing
/// mutates it afterwards. Per-call overrides (see
/// [`TransformOptions::build_profile`](crate::compiler::TransformOptions::build_profile))
/// are layered on top instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioConfig {
    /// Directory holding one subdirectory per project, relative to the root.
    pub projects_dir: String,
    /// Directory receiving compiled HTML, relative to the root.
    pub output_dir: String,
    /// Per-project directory layout.
    pub layout: LayoutConfig,
    /// Transform executable and its default options.
    pub compiler: CompilerConfig,
    /// Web fonts made available to every template, by family name.
    pub fonts: BTreeMap<String, String>,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            projects_dir: "projects".to_string(),
            output_dir: "dist".to_string(),
            layout: LayoutConfig::default(),
            compiler: CompilerConfig::default(),
            fonts: default_fonts(),
        }
    }
}

impl StudioConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.projects_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "projects_dir must not be empty".into(),
            ));
        }
        if self.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation("output_dir must not be empty".into()));
        }
        if Path::new(&self.projects_dir) == Path::new(&self.output_dir) {
            return Err(ConfigError::Validation(
                "output_dir must differ from projects_dir".into(),
            ));
        }
        if self.layout.templates_dir.trim().is_empty() {
            return Err(ConfigError::Validation(
                "layout.templates_dir must not be empty".into(),
            ));
        }
        let ext = &self.layout.template_extension;
        if ext.is_empty() || ext.starts_with('.') {
            return Err(ConfigError::Validation(
                "layout.template_extension must be non-empty and have no leading dot".into(),
            ));
        }
        if ext.eq_ignore_ascii_case(crate::writer::HTML_EXTENSION) {
            return Err(ConfigError::Validation(
                "layout.template_extension must not be the output extension".into(),
            ));
        }
        if self.compiler.command.trim().is_empty() {
            return Err(ConfigError::Validation(
                "compiler.command must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Where things live inside each project directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Template root, relative to the project directory.
    pub templates_dir: String,
    /// Metadata record, relative to the project directory.
    pub metadata_file: String,
    /// Documentation directory, relative to the project directory.
    pub docs_dir: String,
    /// Extension (without dot) that marks a file as a template.
    pub template_extension: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            templates_dir: "templates".to_string(),
            metadata_file: "config/project.json".to_string(),
            docs_dir: "docs".to_string(),
            template_extension: "mjml".to_string(),
        }
    }
}

/// How strictly the transform validates template structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationLevel {
    /// Structural issues abort the transform.
    Strict,
    /// Structural issues are reported as warnings; output is still produced.
    Soft,
    /// No validation.
    Skip,
}

impl ValidationLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            ValidationLevel::Strict => "strict",
            ValidationLevel::Soft => "soft",
            ValidationLevel::Skip => "skip",
        }
    }
}

/// Transform executable plus the global option defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Program to run. Resolved through `PATH` when not a path.
    pub command: String,
    /// Extra arguments placed before the generated ones.
    pub args: Vec<String>,
    pub minify: bool,
    pub beautify: bool,
    pub validation_level: ValidationLevel,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            command: "mjml".to_string(),
            args: Vec::new(),
            minify: false,
            beautify: true,
            validation_level: ValidationLevel::Soft,
        }
    }
}

fn default_fonts() -> BTreeMap<String, String> {
    [
        (
            "Inter",
            "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800&display=swap",
        ),
        (
            "Plus Jakarta Sans",
            "https://fonts.googleapis.com/css2?family=Plus+Jakarta+Sans:wght@400;500;600;700;800&display=swap",
        ),
        (
            "Montserrat",
            "https://fonts.googleapis.com/css2?family=Montserrat:wght@400;500;600;700;800&display=swap",
        ),
        (
            "Open Sans",
            "https://fonts.googleapis.com/css2?family=Open+Sans:wght@400;500;600;700;800&display=swap",
        ),
    ]
    .into_iter()
    .map(|(family, url)| (family.to_string(), url.to_string()))
    .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer the user's `studio.toml` is merged onto.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(StudioConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `studio.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<StudioConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: StudioConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the workspace config from `studio.toml` in `root`.
///
/// Falls back to stock defaults when the file is absent.
pub fn load_config(root: &Path) -> Result<StudioConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `studio.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# MJML Studio Configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory holding one subdirectory per project.
projects_dir = "projects"

# Compiled HTML is written to <output_dir>/<project>/, mirroring templates/.
output_dir = "dist"

# ---------------------------------------------------------------------------
# Project layout
# ---------------------------------------------------------------------------
[layout]
# Template root inside each project. Nested directories are compiled too.
templates_dir = "templates"

# Optional metadata record (JSON, needs at least "displayName").
metadata_file = "config/project.json"

# Where `ses-template` writes its JSON files.
docs_dir = "docs"

# Files with this extension are compiled.
template_extension = "mjml"

# ---------------------------------------------------------------------------
# Compiler
# ---------------------------------------------------------------------------
[compiler]
# Transform executable (resolved through PATH).
command = "mjml"

# Extra arguments placed before the generated ones.
args = []

# Global defaults. `build` always compiles with minify = true,
# beautify = false and validation_level = "soft".
minify = false
beautify = true

# One of "strict", "soft", "skip".
validation_level = "soft"

# ---------------------------------------------------------------------------
# Fonts available to every template
# ---------------------------------------------------------------------------
[fonts]
"Inter" = "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700;800&display=swap"
"Montserrat" = "https://fonts.googleapis.com/css2?family=Montserrat:wght@400;500;600;700;800&display=swap"
"Open Sans" = "https://fonts.googleapis.com/css2?family=Open+Sans:wght@400;500;600;700;800&display=swap"
"Plus Jakarta Sans" = "https://fonts.googleapis.com/css2?family=Plus+Jakarta+Sans:wght@400;500;600;700;800&display=swap"
"##
}
