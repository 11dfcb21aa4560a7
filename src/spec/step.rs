//! The step specification proper.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use serde_json::Value;

use super::body::BodyType;
use super::checks::{scalar_string, AssertionSpec, RelationSpec};
use super::controller::Controller;

/// Transport options for one request.
///
/// Every entry is optional; only non-null entries are applied to the
/// request, logged, or offered to request-echo extraction.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestOptions {
    /// Request headers.
    pub headers: Option<HashMap<String, String>>,
    /// Cookies sent with this call, merged over session cookies.
    pub cookies: Option<HashMap<String, String>>,
    /// Query parameters.
    pub params: Option<HashMap<String, String>>,
    /// Raw or form body payload.
    pub data: Option<Value>,
    /// JSON body payload.
    pub json: Option<Value>,
    /// Multipart upload parts.
    pub files: Option<Vec<FilePart>>,
    /// Scheme-to-URL proxy mapping, honored when the call builds its own
    /// client.
    pub proxies: Option<HashMap<String, String>>,
}

/// One part of a multipart upload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilePart {
    /// Form field name.
    pub field: String,
    /// File name reported to the server and shown in logs.
    pub file_name: String,
    /// File to read at dispatch time.
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inline content, used when no path is given.
    #[serde(default)]
    pub content: Option<String>,
    /// MIME type for the part.
    #[serde(default)]
    pub mime: Option<String>,
}

/// Declarative description of one API test step.
///
/// Built once by an external loader and read-only to the pipeline except
/// for the two documented request-shaping adjustments (form re-encoding and
/// multipart content-type removal), which happen on the built request, not
/// on the spec itself.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepSpec {
    /// Display identifier, shown in banner logs and the assert result.
    #[serde(default, alias = "apiId", deserialize_with = "scalar_string")]
    pub id: String,
    /// Display name.
    #[serde(default, alias = "apiName")]
    pub name: String,
    /// HTTP method, validated at build time.
    pub method: String,
    /// Base URL.
    pub url: String,
    /// Path joined onto the base URL with a single separator.
    #[serde(default)]
    pub path: String,
    /// Body encoding tag.
    #[serde(default, alias = "body_type")]
    pub body_type: BodyType,
    /// Transport options.
    #[serde(default, alias = "others")]
    pub options: RequestOptions,
    /// Session and sleep flags.
    #[serde(default)]
    pub controller: Controller,
    /// Ordered assertions; `None` (or an empty list) selects the default
    /// status-200 check.
    #[serde(default)]
    pub assertions: Option<Vec<AssertionSpec>>,
    /// Ordered extractions into the shared context.
    #[serde(default)]
    pub relations: Option<Vec<RelationSpec>>,
}

impl Default for StepSpec {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            method: "GET".to_string(),
            url: String::new(),
            path: String::new(),
            body_type: BodyType::default(),
            options: RequestOptions::default(),
            controller: Controller::default(),
            assertions: None,
            relations: None,
        }
    }
}
