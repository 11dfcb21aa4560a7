//! Extraction method tags.

use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// How an extraction expression should be interpreted.
///
/// Unrecognized method names are preserved as [`ExtractMethod::Unknown`]
/// rather than rejected during deserialization; the extractor reports them
/// as a typed error when the expression is actually evaluated, so a bad
/// method in an assertion degrades to a failing assertion while the same
/// method in a relation aborts the step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractMethod {
    /// Dotted/bracketed path into a JSON document, e.g. `$.data.items[0].id`.
    JsonPath,
    /// Regular expression applied to the textual form of the data.
    Regex,
    /// A method name the crate does not implement.
    Unknown(String),
}

impl ExtractMethod {
    /// Wire name of the method.
    pub fn as_str(&self) -> &str {
        match self {
            ExtractMethod::JsonPath => "jsonpath",
            ExtractMethod::Regex => "regex",
            ExtractMethod::Unknown(raw) => raw,
        }
    }
}

impl Default for ExtractMethod {
    fn default() -> Self {
        ExtractMethod::JsonPath
    }
}

impl From<&str> for ExtractMethod {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "jsonpath" => ExtractMethod::JsonPath,
            "regex" | "regular" => ExtractMethod::Regex,
            _ => ExtractMethod::Unknown(raw.to_string()),
        }
    }
}

impl fmt::Display for ExtractMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExtractMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ExtractMethod::from(raw.as_str()))
    }
}

impl Serialize for ExtractMethod {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_methods_parse_case_insensitively() {
        assert_eq!(ExtractMethod::from("jsonpath"), ExtractMethod::JsonPath);
        assert_eq!(ExtractMethod::from("JSONPath"), ExtractMethod::JsonPath);
        assert_eq!(ExtractMethod::from("regex"), ExtractMethod::Regex);
        assert_eq!(ExtractMethod::from("Regular"), ExtractMethod::Regex);
    }

    #[test]
    fn test_unknown_method_preserves_original_spelling() {
        let method = ExtractMethod::from("xpath");
        assert_eq!(method, ExtractMethod::Unknown("xpath".to_string()));
        assert_eq!(method.as_str(), "xpath");
    }

    #[test]
    fn test_default_is_jsonpath() {
        assert_eq!(ExtractMethod::default(), ExtractMethod::JsonPath);
    }

    #[test]
    fn test_deserializes_from_json_string() {
        let method: ExtractMethod = serde_json::from_str("\"regex\"").unwrap();
        assert_eq!(method, ExtractMethod::Regex);
    }
}
