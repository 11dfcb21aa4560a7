//! Assertion evaluation against a captured response.

use log::debug;
use serde::Serialize;
use serde_json::{json, Value};

use crate::assertion::Comparer;
use crate::config::DEFAULT_EXPECT_STATUS;
use crate::error_handling::ExtractError;
use crate::extract::Extractor;
use crate::spec::{AssertSource, AssertionSpec, StepSpec};
use crate::step::response::CapturedResponse;

/// Verdict for one executed step.
///
/// `messages` holds one line per evaluated assertion, in declaration
/// order. Evaluation stops at the first failure, so a failed result ends
/// with the failure message and carries nothing for the assertions after
/// it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertResult {
    /// Step identifier, echoed from the spec.
    pub step_id: String,
    /// Step name, echoed from the spec.
    pub step_name: String,
    /// Whether every evaluated assertion passed.
    pub passed: bool,
    /// One explanation per evaluated assertion.
    pub messages: Vec<String>,
}

/// Evaluates the step's assertions against the captured response.
///
/// A step with no assertions gets the default check: status code equals
/// 200. Assertion evaluation never aborts the step; extraction problems
/// degrade into failed assertions with an explanatory message.
pub fn evaluate(
    spec: &StepSpec,
    response: &CapturedResponse,
    extractor: &dyn Extractor,
    comparer: &dyn Comparer,
) -> AssertResult {
    let mut passed = true;
    let mut messages = Vec::new();

    match spec.assertions.as_deref() {
        Some(entries) if !entries.is_empty() => {
            for entry in entries {
                let (ok, message) = evaluate_entry(entry, response, extractor, comparer);
                debug!("[{}][{}] {}", spec.id, spec.name, message);
                messages.push(message);
                if !ok {
                    passed = false;
                    break;
                }
            }
        }
        _ => {
            let (ok, message) = comparer.compare(
                "equal",
                &json!(response.status),
                &DEFAULT_EXPECT_STATUS.to_string(),
            );
            debug!("[{}][{}] {}", spec.id, spec.name, message);
            messages.push(message);
            passed = ok;
        }
    }

    AssertResult {
        step_id: spec.id.clone(),
        step_name: spec.name.clone(),
        passed,
        messages,
    }
}

fn evaluate_entry(
    entry: &AssertionSpec,
    response: &CapturedResponse,
    extractor: &dyn Extractor,
    comparer: &dyn Comparer,
) -> (bool, String) {
    match resolve_actual(entry, response, extractor) {
        Ok(actual) => comparer.compare(&entry.comparison, &actual, &entry.expect),
        Err(error) => (false, format!("response failed or {error}")),
    }
}

fn resolve_actual(
    entry: &AssertionSpec,
    response: &CapturedResponse,
    extractor: &dyn Extractor,
) -> Result<Value, ExtractError> {
    match &entry.from {
        AssertSource::Status => Ok(json!(response.status)),
        AssertSource::ResponseHeader => {
            extractor.extract(&entry.method, &response.headers_value(), &entry.expression)
        }
        AssertSource::ResponseBody => {
            extractor.extract(&entry.method, &response.body.to_value(), &entry.expression)
        }
        AssertSource::Unknown(location) => {
            Err(ExtractError::UnsupportedSource(location.clone()))
        }
    }
}
