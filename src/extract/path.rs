//! Built-in path and regex extraction.

use regex::Regex;
use serde_json::Value;

use crate::error_handling::ExtractError;

use super::method::ExtractMethod;
use super::Extractor;

/// Default [`Extractor`] backed by JSON pointer lookup and the `regex` crate.
///
/// `jsonpath` expressions cover the plain-path subset: an optional `$` root,
/// dotted member names, numeric `[0]` indices, and quoted `['key']` members.
/// Recursive descent, wildcards, and filters are rejected with a typed
/// error rather than silently matching nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct PathExtractor;

impl PathExtractor {
    /// Creates the extractor.
    pub fn new() -> Self {
        Self
    }

    fn extract_json_path(&self, data: &Value, expression: &str) -> Result<Value, ExtractError> {
        let pointer = to_pointer(expression)?;
        match data.pointer(&pointer) {
            Some(value) => Ok(value.clone()),
            None => Err(ExtractError::NoMatch {
                expression: expression.to_string(),
            }),
        }
    }

    fn extract_regex(&self, data: &Value, expression: &str) -> Result<Value, ExtractError> {
        let pattern = Regex::new(expression).map_err(|e| ExtractError::InvalidExpression {
            expression: expression.to_string(),
            reason: e.to_string(),
        })?;
        // Strings are matched raw; structured values are matched against
        // their compact JSON text.
        let haystack = match data {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        let captures = pattern
            .captures(&haystack)
            .ok_or_else(|| ExtractError::NoMatch {
                expression: expression.to_string(),
            })?;
        let matched = captures
            .get(1)
            .or_else(|| captures.get(0))
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        Ok(Value::String(matched))
    }
}

impl Extractor for PathExtractor {
    fn extract(
        &self,
        method: &ExtractMethod,
        data: &Value,
        expression: &str,
    ) -> Result<Value, ExtractError> {
        match method {
            ExtractMethod::JsonPath => self.extract_json_path(data, expression),
            ExtractMethod::Regex => self.extract_regex(data, expression),
            ExtractMethod::Unknown(name) => Err(ExtractError::UnsupportedMethod(name.clone())),
        }
    }
}

/// Translates a plain-path `jsonpath` expression into a JSON pointer.
///
/// `$.data.items[0].id` becomes `/data/items/0/id`. An empty expression (or
/// bare `$`) maps to the empty pointer, i.e. the whole document.
///
/// # Errors
///
/// Returns [`ExtractError::InvalidExpression`] for syntax outside the
/// supported subset.
fn to_pointer(expression: &str) -> Result<String, ExtractError> {
    let trimmed = expression.trim();
    let rest = trimmed.strip_prefix('$').unwrap_or(trimmed);
    // Checked before the leading '.' is stripped, or `$..key` would read
    // as `$.key`.
    if rest.contains("..") {
        return Err(invalid(expression, "recursive descent is not supported"));
    }
    let rest = rest.strip_prefix('.').unwrap_or(rest);
    if rest.is_empty() {
        return Ok(String::new());
    }

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut chars = rest.chars();
    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
            }
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut inner = String::new();
                let mut closed = false;
                for c2 in chars.by_ref() {
                    if c2 == ']' {
                        closed = true;
                        break;
                    }
                    inner.push(c2);
                }
                if !closed {
                    return Err(invalid(expression, "unterminated '[' index"));
                }
                segments.push(bracket_segment(expression, inner.trim())?);
            }
            '*' => return Err(invalid(expression, "wildcards are not supported")),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    let mut pointer = String::new();
    for segment in &segments {
        pointer.push('/');
        // JSON pointer escaping for keys containing '~' or '/'.
        pointer.push_str(&segment.replace('~', "~0").replace('/', "~1"));
    }
    Ok(pointer)
}

fn bracket_segment(expression: &str, inner: &str) -> Result<String, ExtractError> {
    let quoted = (inner.starts_with('\'') && inner.ends_with('\'') && inner.len() >= 2)
        || (inner.starts_with('"') && inner.ends_with('"') && inner.len() >= 2);
    if quoted {
        return Ok(inner[1..inner.len() - 1].to_string());
    }
    if !inner.is_empty() && inner.chars().all(|c| c.is_ascii_digit()) {
        return Ok(inner.to_string());
    }
    Err(invalid(
        expression,
        "only numeric indices and quoted keys are supported inside '[]'",
    ))
}

fn invalid(expression: &str, reason: &str) -> ExtractError {
    ExtractError::InvalidExpression {
        expression: expression.to_string(),
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn extract(method: ExtractMethod, data: &Value, expression: &str) -> Result<Value, ExtractError> {
        PathExtractor::new().extract(&method, data, expression)
    }

    #[test]
    fn test_root_expression_returns_whole_document() {
        let data = json!({"a": 1});
        let value = extract(ExtractMethod::JsonPath, &data, "$").unwrap();
        assert_eq!(value, data);
    }

    #[test]
    fn test_nested_object_and_array_path() {
        let data = json!({"data": {"items": [{"id": 7}, {"id": 8}]}});
        let value = extract(ExtractMethod::JsonPath, &data, "$.data.items[1].id").unwrap();
        assert_eq!(value, json!(8));
    }

    #[test]
    fn test_path_without_dollar_prefix() {
        let data = json!({"token": "abc"});
        let value = extract(ExtractMethod::JsonPath, &data, "token").unwrap();
        assert_eq!(value, json!("abc"));
    }

    #[test]
    fn test_bracket_quoted_key() {
        let data = json!({"content-type": "application/json"});
        let value = extract(ExtractMethod::JsonPath, &data, "$['content-type']").unwrap();
        assert_eq!(value, json!("application/json"));
    }

    #[test]
    fn test_missing_path_is_no_match() {
        let data = json!({"a": 1});
        let err = extract(ExtractMethod::JsonPath, &data, "$.b").unwrap_err();
        assert!(matches!(err, ExtractError::NoMatch { .. }));
    }

    #[test]
    fn test_wildcard_is_rejected() {
        let data = json!({"a": [1, 2]});
        let err = extract(ExtractMethod::JsonPath, &data, "$.a[*]").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidExpression { .. }));
    }

    #[test]
    fn test_recursive_descent_is_rejected() {
        // The top-level key exists, so resolving this as `$.b` would
        // succeed with the wrong value instead of erroring.
        let data = json!({"b": 2, "a": {"b": 1}});
        let err = extract(ExtractMethod::JsonPath, &data, "$..b").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidExpression { .. }));

        let err = extract(ExtractMethod::JsonPath, &data, "$.a..b").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidExpression { .. }));

        let err = extract(ExtractMethod::JsonPath, &data, "..b").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidExpression { .. }));
    }

    #[test]
    fn test_regex_prefers_first_capture_group() {
        let data = json!("session=abc123; path=/");
        let value = extract(ExtractMethod::Regex, &data, r"session=(\w+)").unwrap();
        assert_eq!(value, json!("abc123"));
    }

    #[test]
    fn test_regex_without_group_returns_whole_match() {
        let data = json!("order 42 confirmed");
        let value = extract(ExtractMethod::Regex, &data, r"\d+").unwrap();
        assert_eq!(value, json!("42"));
    }

    #[test]
    fn test_regex_matches_serialized_structured_value() {
        let data = json!({"code": 42});
        let value = extract(ExtractMethod::Regex, &data, r#""code":(\d+)"#).unwrap();
        assert_eq!(value, json!("42"));
    }

    #[test]
    fn test_regex_no_match() {
        let data = json!("hello");
        let err = extract(ExtractMethod::Regex, &data, r"\d+").unwrap_err();
        assert!(matches!(err, ExtractError::NoMatch { .. }));
    }

    #[test]
    fn test_regex_invalid_pattern() {
        let data = json!("hello");
        let err = extract(ExtractMethod::Regex, &data, "(unclosed").unwrap_err();
        assert!(matches!(err, ExtractError::InvalidExpression { .. }));
    }

    #[test]
    fn test_unknown_method_is_typed_error() {
        let data = json!({});
        let err = extract(
            ExtractMethod::Unknown("xpath".to_string()),
            &data,
            "//node",
        )
        .unwrap_err();
        assert_eq!(err, ExtractError::UnsupportedMethod("xpath".to_string()));
    }

    #[test]
    fn test_pointer_escaping_for_special_keys() {
        let data = json!({"a/b": {"c~d": 5}});
        let value = extract(ExtractMethod::JsonPath, &data, "$['a/b']['c~d']").unwrap();
        assert_eq!(value, json!(5));
    }

    #[test]
    fn test_extraction_does_not_mutate_input() {
        let data = json!({"data": {"items": [1, 2, 3]}});
        let before = data.clone();
        let _ = extract(ExtractMethod::JsonPath, &data, "$.data.items[0]");
        assert_eq!(data, before);
    }
}
