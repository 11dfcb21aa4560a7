//! Assertion and relation entries.

use std::fmt;

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;
use serde_json::Value;

use crate::extract::ExtractMethod;

/// Where an assertion reads its actual value from.
///
/// Unknown locations survive deserialization and degrade to a failing
/// assertion when the entry is evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssertSource {
    /// The response status code.
    Status,
    /// The captured response headers.
    ResponseHeader,
    /// The decoded response body.
    ResponseBody,
    /// A location this crate cannot assert against.
    Unknown(String),
}

impl AssertSource {
    /// Wire name of the location.
    pub fn as_str(&self) -> &str {
        match self {
            AssertSource::Status => "status",
            AssertSource::ResponseHeader => "responseHeader",
            AssertSource::ResponseBody => "responseBody",
            AssertSource::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for AssertSource {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "status" | "statuscode" | "rescode" => AssertSource::Status,
            "responseheader" | "resheader" => AssertSource::ResponseHeader,
            "responsebody" | "resbody" => AssertSource::ResponseBody,
            _ => AssertSource::Unknown(raw.to_string()),
        }
    }
}

impl fmt::Display for AssertSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AssertSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(AssertSource::from(raw.as_str()))
    }
}

/// Where a relation pulls its value from.
///
/// The request-side locations read the immutable request snapshot captured
/// at dispatch time. Unknown locations abort the step when the relation
/// runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationSource {
    /// The captured response headers.
    ResponseHeader,
    /// The decoded response body.
    ResponseBody,
    /// Headers of the request that was sent.
    RequestHeader,
    /// Query parameters of the request that was sent.
    RequestQuery,
    /// Body of the request that was sent, by body type.
    RequestBody,
    /// A location this crate cannot extract from.
    Unknown(String),
}

impl RelationSource {
    /// Wire name of the location.
    pub fn as_str(&self) -> &str {
        match self {
            RelationSource::ResponseHeader => "responseHeader",
            RelationSource::ResponseBody => "responseBody",
            RelationSource::RequestHeader => "requestHeader",
            RelationSource::RequestQuery => "requestQuery",
            RelationSource::RequestBody => "requestBody",
            RelationSource::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for RelationSource {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "responseheader" | "resheader" => RelationSource::ResponseHeader,
            "responsebody" | "resbody" => RelationSource::ResponseBody,
            "requestheader" | "reqheader" => RelationSource::RequestHeader,
            "requestquery" | "reqquery" => RelationSource::RequestQuery,
            "requestbody" | "reqbody" => RelationSource::RequestBody,
            _ => RelationSource::Unknown(raw.to_string()),
        }
    }
}

impl fmt::Display for RelationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RelationSource {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(RelationSource::from(raw.as_str()))
    }
}

/// One configured assertion.
#[derive(Debug, Clone, Deserialize)]
pub struct AssertionSpec {
    /// Location of the actual value.
    pub from: AssertSource,
    /// Extraction method for header/body locations.
    #[serde(default)]
    pub method: ExtractMethod,
    /// Extraction expression for header/body locations.
    #[serde(default)]
    pub expression: String,
    /// Comparison kind handed to the comparer.
    #[serde(alias = "assertion")]
    pub comparison: String,
    /// Expected value, kept in its textual form.
    #[serde(deserialize_with = "scalar_string")]
    pub expect: String,
}

/// One configured extraction into the shared context.
#[derive(Debug, Clone, Deserialize)]
pub struct RelationSpec {
    /// Location to extract from. Optional because the `$` and cookie
    /// expressions do not read any location.
    #[serde(default)]
    pub from: Option<RelationSource>,
    /// Extraction method.
    #[serde(default)]
    pub method: ExtractMethod,
    /// Extraction expression.
    pub expression: String,
    /// Destination key in the execution context.
    pub name: String,
}

/// Accepts strings, numbers, and booleans, normalizing to text; loaders
/// frequently write `"expect": 200`.
pub(super) fn scalar_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(D::Error::custom(format!(
            "expected a scalar value, got {other}"
        ))),
    }
}
