//! Response capture and normalization.

use reqwest::header::HeaderMap;
use serde_json::Value;

/// Decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The body parsed as JSON.
    Json(Value),
    /// The body as text, used when it is not valid JSON.
    Text(String),
}

impl ResponseBody {
    /// The body as a JSON value for extraction: parsed JSON as-is, text as
    /// a JSON string.
    pub fn to_value(&self) -> Value {
        match self {
            ResponseBody::Json(value) => value.clone(),
            ResponseBody::Text(text) => Value::String(text.clone()),
        }
    }

    /// Whether the body decoded as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, ResponseBody::Json(_))
    }
}

/// Everything the pipeline keeps from an HTTP response.
///
/// The raw bytes are always retained next to the decoded body; `$`
/// extraction and download logging need them regardless of how decoding
/// went.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    /// Status code.
    pub status: u16,
    /// Response headers, copied verbatim. `HeaderMap` lookups are
    /// case-insensitive.
    pub headers: HeaderMap,
    /// Decoded body.
    pub body: ResponseBody,
    /// Raw body bytes.
    pub bytes: Vec<u8>,
    /// Response cookies flattened to `k=v;k2=v2`; empty when the response
    /// set none.
    pub cookies: String,
}

impl CapturedResponse {
    /// Headers as a JSON object for extraction. Repeated header names are
    /// comma-joined the way HTTP presents them.
    pub fn headers_value(&self) -> Value {
        let mut object = serde_json::Map::new();
        for name in self.headers.keys() {
            let joined = self
                .headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");
            object.insert(name.as_str().to_string(), Value::String(joined));
        }
        Value::Object(object)
    }
}

/// Reads the response to completion and normalizes it.
///
/// # Errors
///
/// Returns the transport error if the body cannot be read.
pub async fn capture(response: reqwest::Response) -> Result<CapturedResponse, reqwest::Error> {
    let status = response.status().as_u16();
    let headers = response.headers().clone();
    let cookies = flatten_cookies(&response);
    let bytes = response.bytes().await?.to_vec();
    let body = decode_body(&bytes);
    Ok(CapturedResponse {
        status,
        headers,
        body,
        bytes,
        cookies,
    })
}

fn flatten_cookies(response: &reqwest::Response) -> String {
    let mut flat = String::new();
    for cookie in response.cookies() {
        if !flat.is_empty() {
            flat.push(';');
        }
        flat.push_str(cookie.name());
        flat.push('=');
        flat.push_str(cookie.value());
    }
    flat
}

/// JSON decode first, text fallback.
fn decode_body(bytes: &[u8]) -> ResponseBody {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value) => ResponseBody::Json(value),
        Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
    }
}
