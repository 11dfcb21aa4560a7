//! Request dispatch under the four session strategies.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE};
use serde_json::Value;

use crate::error_handling::StepError;
use crate::harness::{DurationRecorder, StepLogger};
use crate::initialization::{build_client, ClientConfig};
use crate::spec::{Controller, FilePart, SessionStrategy};
use crate::step::request::BuiltRequest;

use super::state::Session;

/// Dispatches a built request under the controller's session strategy.
///
/// Waits out the configured pre-dispatch sleep, then times the call and
/// records the duration on success. Which session object carries cookie
/// state is the whole point of the strategy:
/// shared-persist mutates the caller's session, shared-isolated works on a
/// deep copy, fresh-discarded and stateless build their own client per
/// call. Transport failures propagate unmodified; no retry happens here.
///
/// # Errors
///
/// Returns [`StepError::Transport`] for connection and protocol failures,
/// and [`StepError::Configuration`] for unusable headers, proxies, or
/// upload files.
pub async fn dispatch(
    built: &BuiltRequest,
    controller: &Controller,
    session: &mut Session,
    client_config: &ClientConfig,
    logger: &dyn StepLogger,
    recorder: &dyn DurationRecorder,
) -> Result<reqwest::Response, StepError> {
    if controller.sleep_before_run > 0 {
        tokio::time::sleep(Duration::from_secs(controller.sleep_before_run)).await;
        logger.debug_log(&format!(
            "waited {}s before dispatch",
            controller.sleep_before_run
        ));
    }

    let strategy = controller.strategy();
    let proxies = built.options.proxies.as_ref();
    let start = Instant::now();
    let response = match strategy {
        SessionStrategy::SharedPersist => {
            note_ignored_proxies(proxies, logger);
            let cookie_header = session.cookie_header(built.options.cookies.as_ref());
            let response = send(session.client(), built, cookie_header).await?;
            session.absorb(&response);
            response
        }
        SessionStrategy::SharedIsolated => {
            note_ignored_proxies(proxies, logger);
            let mut copy = session.clone();
            let cookie_header = copy.cookie_header(built.options.cookies.as_ref());
            let response = send(copy.client(), built, cookie_header).await?;
            // State lands in the copy, which is dropped with this arm.
            copy.absorb(&response);
            response
        }
        SessionStrategy::FreshDiscarded => {
            let mut fresh = Session::new(build_client(client_config, proxies)?);
            let cookie_header = fresh.cookie_header(built.options.cookies.as_ref());
            let response = send(fresh.client(), built, cookie_header).await?;
            fresh.absorb(&response);
            response
        }
        SessionStrategy::Stateless => {
            let client = build_client(client_config, proxies)?;
            let cookie_header = call_cookie_header(built.options.cookies.as_ref());
            send(&client, built, cookie_header).await?
        }
    };
    let elapsed = start.elapsed();
    recorder.record_duration(elapsed.as_millis() as u64);
    Ok(response)
}

fn note_ignored_proxies(proxies: Option<&HashMap<String, String>>, logger: &dyn StepLogger) {
    if proxies.is_some() {
        logger.debug_log("proxies option ignored: shared-session modes reuse the session's client");
    }
}

/// Cookie header for calls with no session state at all.
fn call_cookie_header(cookies: Option<&HashMap<String, String>>) -> Option<String> {
    let cookies = cookies?;
    if cookies.is_empty() {
        return None;
    }
    let mut pairs: Vec<String> = cookies
        .iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();
    pairs.sort();
    Some(pairs.join("; "))
}

async fn send(
    client: &reqwest::Client,
    built: &BuiltRequest,
    cookie_header: Option<String>,
) -> Result<reqwest::Response, StepError> {
    let mut request = client.request(built.method.clone(), built.url.as_str());
    if let Some(headers) = &built.options.headers {
        request = request.headers(header_map(headers)?);
    }
    if let Some(cookie) = cookie_header {
        request = request.header(COOKIE, cookie);
    }
    if let Some(params) = &built.options.params {
        request = request.query(params);
    }
    request = apply_body(request, built).await?;
    let response = request.send().await?;
    Ok(response)
}

/// Applies the body options the way the options were written: multipart
/// when files are present (flat `data` fields ride along as form text),
/// otherwise the `json` option, otherwise `data` as a plain body.
async fn apply_body(
    request: reqwest::RequestBuilder,
    built: &BuiltRequest,
) -> Result<reqwest::RequestBuilder, StepError> {
    if let Some(files) = &built.options.files {
        let mut form = reqwest::multipart::Form::new();
        if let Some(Value::Object(fields)) = &built.options.data {
            for (name, value) in fields {
                form = form.text(name.clone(), text_value(value));
            }
        }
        for part in files {
            form = form.part(part.field.clone(), file_part(part).await?);
        }
        return Ok(request.multipart(form));
    }
    if let Some(json) = &built.options.json {
        return Ok(request.json(json));
    }
    if let Some(data) = &built.options.data {
        return Ok(request.body(text_value(data)));
    }
    Ok(request)
}

async fn file_part(spec: &FilePart) -> Result<reqwest::multipart::Part, StepError> {
    let part = if let Some(path) = &spec.path {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            StepError::Configuration(format!(
                "cannot read upload file '{}': {e}",
                path.display()
            ))
        })?;
        reqwest::multipart::Part::bytes(bytes)
    } else if let Some(content) = &spec.content {
        reqwest::multipart::Part::text(content.clone())
    } else {
        return Err(StepError::Configuration(format!(
            "file part '{}' has neither path nor content",
            spec.field
        )));
    };
    let mut part = part.file_name(spec.file_name.clone());
    if let Some(mime) = &spec.mime {
        part = part
            .mime_str(mime)
            .map_err(|e| StepError::Configuration(format!("invalid mime type '{mime}': {e}")))?;
    }
    Ok(part)
}

fn text_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, StepError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (raw_name, raw_value) in headers {
        let name = HeaderName::from_bytes(raw_name.as_bytes()).map_err(|e| {
            StepError::Configuration(format!("invalid header name '{raw_name}': {e}"))
        })?;
        let value = HeaderValue::from_str(raw_value).map_err(|e| {
            StepError::Configuration(format!("invalid value for header '{raw_name}': {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}
