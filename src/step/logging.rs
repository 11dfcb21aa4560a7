//! Request and response logging for executed steps.
//!
//! Everything here goes through the [`StepLogger`] seam so tests can
//! capture output without a global logger.

use std::collections::BTreeMap;
use std::collections::HashMap;

use reqwest::header::CONTENT_DISPOSITION;
use serde_json::Value;

use crate::config::MAX_LOG_VALUE_CHARS;
use crate::harness::StepLogger;
use crate::step::request::BuiltRequest;
use crate::step::response::CapturedResponse;

/// Logs the step banner printed before any work happens.
pub fn log_step_started(id: &str, name: &str, logger: &dyn StepLogger) {
    logger.debug_log(&format!("[{id}][{name}] step started"));
}

/// Logs the step banner printed after the step, pass or fail.
pub fn log_step_finished(id: &str, name: &str, logger: &dyn StepLogger) {
    logger.debug_log(&format!("[{id}][{name}] step finished"));
}

/// Logs the request about to be dispatched, one line per configured
/// option.
pub fn log_request(built: &BuiltRequest, logger: &dyn StepLogger) {
    logger.debug_log(&format!("request: {} {}", built.method, built.url));
    let options = &built.options;
    if let Some(headers) = &options.headers {
        logger.debug_log(&format!("request headers: {}", sorted_object(headers)));
    }
    if let Some(cookies) = &options.cookies {
        logger.debug_log(&format!("cookies: {}", sorted_object(cookies)));
    }
    if let Some(params) = &options.params {
        logger.debug_log(&format!("query params: {}", sorted_object(params)));
    }
    if let Some(data) = &options.data {
        logger.debug_log(&format!("request body: {}", preview(serialize_for_log(data))));
    }
    if let Some(json) = &options.json {
        logger.debug_log(&format!("request body: {}", preview(serialize_for_log(json))));
    }
    if let Some(files) = &options.files {
        let names: Vec<&str> = files.iter().map(|part| part.file_name.as_str()).collect();
        logger.debug_log(&format!("upload files: {names:?}"));
    }
    if let Some(proxies) = &options.proxies {
        logger.debug_log(&format!("proxies: {}", sorted_object(proxies)));
    }
}

/// Logs the captured response. A `Content-Disposition` header marks a
/// download, so the body line shows the byte length instead of the
/// content.
pub fn log_response(response: &CapturedResponse, logger: &dyn StepLogger) {
    logger.debug_log(&format!("response: status {}", response.status));
    logger.debug_log(&format!(
        "response headers: {}",
        preview(response.headers_value().to_string())
    ));
    if !response.cookies.is_empty() {
        logger.debug_log(&format!("response cookies: {}", response.cookies));
    }
    if response.headers.contains_key(CONTENT_DISPOSITION) {
        logger.debug_log(&format!(
            "response body: file content not shown, {} bytes",
            response.bytes.len()
        ));
    } else {
        logger.debug_log(&format!(
            "response body: {}",
            preview(serialize_for_log(&response.body.to_value()))
        ));
    }
}

/// Strings log bare, everything else as compact JSON.
fn serialize_for_log(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Replaces oversized values with a length-only placeholder so one huge
/// payload cannot drown the log.
fn preview(text: String) -> String {
    let length = text.chars().count();
    if length > MAX_LOG_VALUE_CHARS {
        format!("value of length {length} exceeds {MAX_LOG_VALUE_CHARS} characters, not shown")
    } else {
        text
    }
}

/// Key-sorted rendering so map logs are stable across runs.
fn sorted_object(map: &HashMap<String, String>) -> String {
    let ordered: BTreeMap<&String, &String> = map.iter().collect();
    serde_json::to_string(&ordered).unwrap_or_else(|_| String::from("{}"))
}
