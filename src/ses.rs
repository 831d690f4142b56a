//! SES template preparation.
//!
//! Wraps a compiled template into the JSON document accepted by
//! `aws ses create-template --cli-input-json`:
//!
//! ```text
//! dist/todoconta/workshop-welcome.html
//!   + projects/todoconta/config/project.json (aws.templatePrefix)
//!   → projects/todoconta/docs/ses-workshop-welcome.json
//! ```
//!
//! The HTML must already be built; nothing is compiled here.

use crate::registry::{self, RegistryError, Workspace};
use crate::writer::{self, HTML_EXTENSION};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_SUBJECT: &str = "Email from {{displayName}}";
pub const DEFAULT_TEXT: &str = "Please view this email in an HTML-compatible client.";

#[derive(Error, Debug)]
pub enum SesError {
    #[error("Project \"{0}\" not found")]
    ProjectNotFound(String),
    #[error("Project config not found: {0}")]
    MissingMetadata(PathBuf),
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("Invalid template name \"{0}\"")]
    InvalidTemplateName(String),
    #[error("Template not found: {0} (run `build` first)")]
    TemplateNotBuilt(PathBuf),
    #[error("No SES template name: pass --name or set aws.templatePrefix in {0}")]
    MissingTemplatePrefix(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What to prepare. `template` is relative to the project's output root,
/// without extension (`workshop-welcome`, `transactional/receipt`).
#[derive(Debug, Clone, Default)]
pub struct SesRequest {
    pub project: String,
    pub template: String,
    /// Explicit SES template name; defaults to `aws.templatePrefix + template`.
    pub name: Option<String>,
    pub subject: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SesTemplateDocument {
    pub template: SesTemplate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SesTemplate {
    pub template_name: String,
    pub subject_part: String,
    pub html_part: String,
    pub text_part: String,
}

/// Result of [`prepare_ses_template`].
#[derive(Debug, Clone, PartialEq)]
pub struct SesTemplateFile {
    pub path: PathBuf,
    pub template_name: String,
    pub display_name: String,
}

/// Template names address files under the output root and must stay inside it.
fn is_valid_template_name(name: &str) -> bool {
    !name.trim().is_empty()
        && Path::new(name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Nested template paths joined with `-`: `transactional/receipt` becomes
/// `transactional-receipt`. SES names and docs filenames both use this form.
fn flatten(template: &str) -> String {
    template.replace(['/', '\\'], "-")
}

/// `docs/ses-<template>.json`, with nested names flattened.
pub fn document_filename(template: &str) -> String {
    format!("ses-{}.json", flatten(template))
}

/// Write the SES template document for `request` into the project's docs dir.
pub fn prepare_ses_template(
    workspace: &Workspace,
    request: &SesRequest,
) -> Result<SesTemplateFile, SesError> {
    let id = request.project.as_str();
    if !workspace.project_dir(id).is_dir() {
        return Err(SesError::ProjectNotFound(id.to_string()));
    }

    let metadata_path = workspace.metadata_path(id);
    if !metadata_path.is_file() {
        return Err(SesError::MissingMetadata(metadata_path));
    }
    let project = registry::load_project_meta(workspace, id)?;

    let template = request
        .template
        .strip_suffix(&format!(".{HTML_EXTENSION}"))
        .unwrap_or(&request.template);
    if !is_valid_template_name(template) {
        return Err(SesError::InvalidTemplateName(request.template.clone()));
    }

    let html_path = writer::output_path(&project.output_root, Path::new(template));
    if !html_path.is_file() {
        return Err(SesError::TemplateNotBuilt(html_path));
    }
    let html = fs::read_to_string(&html_path)?;

    let template_name = match &request.name {
        Some(name) => name.clone(),
        None => {
            let prefix = project
                .meta
                .as_ref()
                .and_then(|m| m.aws.as_ref())
                .and_then(|aws| aws.template_prefix.as_deref())
                .ok_or(SesError::MissingTemplatePrefix(metadata_path))?;
            format!("{prefix}{}", flatten(template))
        }
    };

    let document = SesTemplateDocument {
        template: SesTemplate {
            template_name: template_name.clone(),
            subject_part: request
                .subject
                .clone()
                .unwrap_or_else(|| DEFAULT_SUBJECT.to_string()),
            html_part: html,
            text_part: request
                .text
                .clone()
                .unwrap_or_else(|| DEFAULT_TEXT.to_string()),
        },
    };

    let docs_dir = workspace.docs_dir(id);
    fs::create_dir_all(&docs_dir)?;
    let path = docs_dir.join(document_filename(template));
    fs::write(&path, serde_json::to_string_pretty(&document)?)?;
    debug!(path = %path.display(), template = %template_name, "wrote SES template");

    Ok(SesTemplateFile {
        path,
        template_name,
        display_name: project.display_name,
    })
}
