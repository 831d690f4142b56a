//! Shared serialized types.
//!
//! `ProjectMeta` mirrors `config/project.json` inside each project. The file
//! carries much more than the build needs (branding, social links, legal
//! URLs); only the fields below are read and everything else is ignored.

use serde::{Deserialize, Serialize};

/// Per-project metadata record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    /// Machine name, normally equal to the directory name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable name used in progress output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Email-sending settings, used when preparing SES templates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsSettings>,
}

/// The `aws` block of `project.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Prepended to the template name when no explicit SES name is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_project_json() {
        let json = r##"{
            "name": "todoconta",
            "displayName": "TodoConta",
            "description": "Accounting workshops",
            "author": "Ana",
            "sender": { "name": "Ana - TodoConta", "email": "hola@todoconta.mx" },
            "aws": {
                "region": "us-east-1",
                "templatePrefix": "todoconta-",
                "sourceEmail": "hola@todoconta.mx"
            },
            "website": "https://todoconta.mx",
            "branding": { "logo": "", "logoWidth": "50px" }
        }"##;

        let meta: ProjectMeta = serde_json::from_str(json).unwrap();
        assert_eq!(meta.display_name.as_deref(), Some("TodoConta"));
        assert_eq!(meta.website.as_deref(), Some("https://todoconta.mx"));
        let aws = meta.aws.unwrap();
        assert_eq!(aws.template_prefix.as_deref(), Some("todoconta-"));
        assert_eq!(aws.region.as_deref(), Some("us-east-1"));
    }

    #[test]
    fn parse_minimal_project_json() {
        let meta: ProjectMeta = serde_json::from_str(r#"{"displayName": "Acme"}"#).unwrap();
        assert_eq!(meta.display_name.as_deref(), Some("Acme"));
        assert!(meta.aws.is_none());
        assert!(meta.name.is_none());
    }

    #[test]
    fn empty_object_is_valid() {
        let meta: ProjectMeta = serde_json::from_str("{}").unwrap();
        assert_eq!(meta, ProjectMeta::default());
    }
}
