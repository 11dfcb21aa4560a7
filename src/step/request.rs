//! Request building.

use reqwest::Method;
use serde_json::Value;
use url::form_urlencoded;

use crate::error_handling::StepError;
use crate::spec::{BodyType, RequestOptions, StepSpec};

/// The transport-ready form of a step's request, captured before dispatch.
///
/// This snapshot is what goes on the wire, and it is what request-echo
/// extraction reads afterwards; post-dispatch state never leaks into it.
#[derive(Debug, Clone)]
pub struct BuiltRequest {
    /// Validated HTTP method.
    pub method: Method,
    /// Joined base URL and path.
    pub url: String,
    /// Adjusted transport options.
    pub options: RequestOptions,
    /// Body encoding tag, used to pick the request-body echo source.
    pub body_type: BodyType,
}

/// Builds the dispatch snapshot for a step.
///
/// Applies the two documented request adjustments: a form-urlencoded body
/// is percent-encoded into a single string, and any caller-supplied
/// `content-type` header is dropped when multipart files are present so the
/// transport can set the boundary header itself. The spec itself is never
/// touched, so building twice from the same spec yields the same snapshot.
///
/// # Errors
///
/// Returns [`StepError::Configuration`] when the method is not a valid HTTP
/// method token.
pub fn build(spec: &StepSpec) -> Result<BuiltRequest, StepError> {
    let method = Method::from_bytes(spec.method.trim().to_ascii_uppercase().as_bytes())
        .map_err(|_| StepError::Configuration(format!("invalid HTTP method '{}'", spec.method)))?;
    let mut options = spec.options.clone();
    if spec.body_type == BodyType::FormUrlencoded {
        if let Some(data) = options.data.take() {
            options.data = Some(encode_form(data));
        }
    }
    if options.files.is_some() {
        remove_content_type(&mut options);
    }
    Ok(BuiltRequest {
        method,
        url: join_url(&spec.url, &spec.path),
        options,
        body_type: spec.body_type,
    })
}

/// Percent-encodes a flat object into a single `k=v&k2=v2` string. Strings
/// pass through unchanged (already encoded); other shapes pass through
/// untouched.
fn encode_form(data: Value) -> Value {
    match data {
        Value::Object(fields) => {
            let mut serializer = form_urlencoded::Serializer::new(String::new());
            for (name, value) in &fields {
                serializer.append_pair(name, &text_value(value));
            }
            Value::String(serializer.finish())
        }
        other => other,
    }
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn remove_content_type(options: &mut RequestOptions) {
    if let Some(headers) = &mut options.headers {
        headers.retain(|name, _| !name.eq_ignore_ascii_case("content-type"));
    }
}

/// Joins base and path with exactly one separator, leaving everything else
/// as written.
fn join_url(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn spec_with(body_type: &str, options: Value) -> StepSpec {
        serde_json::from_value(json!({
            "method": "POST",
            "url": "http://api.example.com",
            "path": "/items",
            "bodyType": body_type,
            "options": options
        }))
        .unwrap()
    }

    #[test]
    fn test_form_body_is_percent_encoded() {
        let spec = spec_with("form-urlencoded", json!({"data": {"x": "a b", "y": "1"}}));
        let built = build(&spec).unwrap();
        assert_eq!(built.options.data, Some(json!("x=a+b&y=1")));
    }

    #[test]
    fn test_form_encoding_is_idempotent() {
        let spec = spec_with("form-urlencoded", json!({"data": {"x": "a b"}}));
        let first = build(&spec).unwrap();
        let second = build(&spec).unwrap();
        assert_eq!(first.options.data, second.options.data);

        // A string body is already encoded and passes through unchanged.
        let spec = spec_with("form-urlencoded", json!({"data": "x=a+b"}));
        let built = build(&spec).unwrap();
        assert_eq!(built.options.data, Some(json!("x=a+b")));
    }

    #[test]
    fn test_json_body_is_left_alone() {
        let spec = spec_with("json", json!({"json": {"x": "a b"}}));
        let built = build(&spec).unwrap();
        assert_eq!(built.options.json, Some(json!({"x": "a b"})));
        assert!(built.options.data.is_none());
    }

    #[test]
    fn test_files_strip_caller_content_type() {
        let spec = spec_with(
            "json",
            json!({
                "headers": {"Content-TYPE": "application/json", "x-token": "abc"},
                "files": [{"field": "f", "fileName": "a.txt", "content": "hi"}]
            }),
        );
        let built = build(&spec).unwrap();
        let headers = built.options.headers.unwrap();
        assert!(headers.keys().all(|k| !k.eq_ignore_ascii_case("content-type")));
        assert_eq!(headers.get("x-token").map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_no_files_keeps_content_type() {
        let spec = spec_with("json", json!({"headers": {"Content-Type": "text/plain"}}));
        let built = build(&spec).unwrap();
        assert_eq!(
            built.options.headers.unwrap().get("Content-Type").map(String::as_str),
            Some("text/plain")
        );
    }

    #[test]
    fn test_url_join_uses_single_separator() {
        assert_eq!(join_url("http://h/", "/p"), "http://h/p");
        assert_eq!(join_url("http://h", "p"), "http://h/p");
        assert_eq!(join_url("http://h/", "p/q"), "http://h/p/q");
        assert_eq!(join_url("http://h/", ""), "http://h/");
    }

    #[test]
    fn test_method_is_validated_and_uppercased() {
        let mut spec = StepSpec {
            method: "get".to_string(),
            url: "http://h".to_string(),
            ..StepSpec::default()
        };
        assert_eq!(build(&spec).unwrap().method, Method::GET);

        spec.method = "not a method".to_string();
        let err = build(&spec).unwrap_err();
        assert!(matches!(err, StepError::Configuration(_)));
    }
}
