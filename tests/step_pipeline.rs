//! End-to-end tests for single-step execution and the batch runner.
//!
//! These tests verify the full pipeline against a mock HTTP server: build
//! the request, dispatch, capture, assert, extract. No real network access.

use httptest::{matchers::*, responders::*, Expectation, Server};
use serde_json::json;
use tempfile::TempDir;

use apistep::initialization::{init_session, ClientConfig};
use apistep::{
    execute, run_steps, Config, ContextValue, ExecutionContext, StepContext, StepError, StepSpec,
};

fn spec_from(value: serde_json::Value) -> StepSpec {
    serde_json::from_value(value).expect("spec should deserialize")
}

fn harness() -> (apistep::Session, ExecutionContext, StepContext) {
    let session = init_session(&ClientConfig::default()).expect("session should build");
    (session, ExecutionContext::new(), StepContext::default())
}

/// A passing step: assertions evaluated in order, relations extracted.
#[tokio::test]
async fn test_passing_step_extracts_relations() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("POST", "/login")).respond_with(
            status_code(200)
                .append_header("set-cookie", "sid=abc123")
                .body(r#"{"token": "t-9", "user": {"id": 7}}"#),
        ),
    );

    let spec = spec_from(json!({
        "id": "login-1",
        "name": "login",
        "method": "POST",
        "url": server.url("/login").to_string(),
        "options": {"json": {"user": "kim", "pass": "s3cret"}},
        "assertions": [
            {"from": "status", "comparison": "equal", "expect": 200},
            {"from": "resBody", "expression": "$.user.id", "comparison": "equal", "expect": 7}
        ],
        "relations": [
            {"from": "resBody", "expression": "$.token", "name": "token"},
            {"expression": "cookies", "name": "jar"}
        ]
    }));

    let (mut session, mut context, step_context) = harness();
    let result = execute(&spec, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");

    assert!(result.passed());
    assert_eq!(result.response.status, 200);
    assert_eq!(result.assert_result.messages.len(), 2);
    assert_eq!(
        context.get("token"),
        Some(&ContextValue::Json(json!("t-9")))
    );
    assert_eq!(
        context.get("jar"),
        Some(&ContextValue::Json(json!("sid=abc123")))
    );
}

/// A step with no assertions gets the implicit status-200 check.
#[tokio::test]
async fn test_default_status_check() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/ok"))
            .respond_with(status_code(200).body("fine")),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/broken"))
            .respond_with(status_code(500).body("boom")),
    );

    let (mut session, mut context, step_context) = harness();

    let ok = spec_from(json!({
        "method": "GET",
        "url": server.url("/ok").to_string()
    }));
    let result = execute(&ok, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");
    assert!(result.passed());
    assert_eq!(result.assert_result.messages.len(), 1);

    let broken = spec_from(json!({
        "method": "GET",
        "url": server.url("/broken").to_string()
    }));
    let result = execute(&broken, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");
    assert!(!result.passed());
}

/// The first failing assertion stops evaluation and skips extraction.
#[tokio::test]
async fn test_assertion_failure_short_circuits_and_skips_relations() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/thing"))
            .respond_with(status_code(200).body(r#"{"present": true}"#)),
    );

    let spec = spec_from(json!({
        "method": "GET",
        "url": server.url("/thing").to_string(),
        "assertions": [
            {"from": "status", "comparison": "equal", "expect": 204},
            {"from": "status", "comparison": "equal", "expect": 200}
        ],
        "relations": [
            {"from": "resBody", "expression": "$.present", "name": "present"}
        ]
    }));

    let (mut session, mut context, step_context) = harness();
    let result = execute(&spec, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");

    assert!(!result.passed());
    assert_eq!(result.assert_result.messages.len(), 1);
    assert!(context.is_empty(), "failed steps must not extract relations");
}

/// Response cookies flatten to `k=v;k2=v2` with no trailing separator;
/// a response without cookies yields the empty string.
#[tokio::test]
async fn test_cookie_flattening() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/two")).respond_with(
            status_code(200)
                .append_header("set-cookie", "a=1")
                .append_header("set-cookie", "b=2")
                .body("ok"),
        ),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/none"))
            .respond_with(status_code(200).body("ok")),
    );

    let (mut session, mut context, step_context) = harness();

    let two = spec_from(json!({
        "method": "GET",
        "url": server.url("/two").to_string()
    }));
    let result = execute(&two, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");
    let cookies = &result.response.cookies;
    assert!(cookies.contains("a=1") && cookies.contains("b=2"));
    assert_eq!(cookies.chars().filter(|&c| c == ';').count(), 1);
    assert!(!cookies.ends_with(';'));

    let none = spec_from(json!({
        "method": "GET",
        "url": server.url("/none").to_string()
    }));
    let result = execute(&none, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");
    assert_eq!(result.response.cookies, "");
}

/// A non-JSON body still captures, asserts, and extracts as text.
#[tokio::test]
async fn test_text_body_capture() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/plain"))
            .respond_with(status_code(200).body("pong 42")),
    );

    let spec = spec_from(json!({
        "method": "GET",
        "url": server.url("/plain").to_string(),
        "assertions": [
            {"from": "resBody", "method": "regex", "expression": r"pong (\d+)",
             "comparison": "equal", "expect": 42}
        ]
    }));

    let (mut session, mut context, step_context) = harness();
    let result = execute(&spec, &mut session, &mut context, &step_context)
        .await
        .expect("step should run");
    assert!(result.passed());
    assert!(!result.response.body.is_json());
}

/// Connection failures surface as transport errors, not panics.
#[tokio::test]
async fn test_transport_error_aborts_step() {
    // Grab a free port and release it so the connect is refused.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let spec = spec_from(json!({
        "method": "GET",
        "url": format!("http://{addr}/")
    }));

    let (mut session, mut context, step_context) = harness();
    let err = execute(&spec, &mut session, &mut context, &step_context)
        .await
        .expect_err("step should fail");
    assert!(matches!(err, StepError::Transport(_)));
}

/// An invalid method is rejected before anything goes on the wire.
#[tokio::test]
async fn test_invalid_method_is_configuration_error() {
    let spec = spec_from(json!({
        "method": "not a method",
        "url": "http://localhost:1/"
    }));

    let (mut session, mut context, step_context) = harness();
    let err = execute(&spec, &mut session, &mut context, &step_context)
        .await
        .expect_err("step should fail");
    assert!(matches!(err, StepError::Configuration(_)));
}

/// The batch runner executes a whole file and counts verdicts.
#[tokio::test]
async fn test_run_steps_from_file() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/first"))
            .respond_with(status_code(200).body(r#"{"ok": true}"#)),
    );
    server.expect(
        Expectation::matching(request::method_path("GET", "/second"))
            .respond_with(status_code(404).body("missing")),
    );

    let steps = json!([
        {"id": "1", "name": "first", "method": "GET", "url": server.url("/first").to_string()},
        {"id": "2", "name": "second", "method": "GET", "url": server.url("/second").to_string()}
    ]);

    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("steps.json");
    std::fs::write(&file, steps.to_string()).expect("write steps file");

    let config = Config {
        file,
        ..Config::default()
    };
    let report = run_steps(config).await.expect("run should complete");

    assert_eq!(report.total_steps, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.results.len(), 2);
    assert!(report.results[0].passed);
    assert!(!report.results[1].passed);
    assert_eq!(report.results[1].step_id, "2");
}

/// A step that aborts mid-run is counted as failed and the run continues.
#[tokio::test]
async fn test_run_steps_continues_after_aborted_step() {
    let server = Server::run();
    server.expect(
        Expectation::matching(request::method_path("GET", "/alive"))
            .respond_with(status_code(200).body("ok")),
    );

    let steps = json!([
        {"id": "bad", "name": "bad method", "method": "???", "url": "http://localhost:1/"},
        {"id": "good", "name": "alive", "method": "GET", "url": server.url("/alive").to_string()}
    ]);

    let dir = TempDir::new().expect("temp dir");
    let file = dir.path().join("steps.json");
    std::fs::write(&file, steps.to_string()).expect("write steps file");

    let config = Config {
        file,
        ..Config::default()
    };
    let report = run_steps(config).await.expect("run should complete");

    assert_eq!(report.total_steps, 2);
    assert_eq!(report.passed, 1);
    assert_eq!(report.failed, 1);
    assert!(!report.results[0].passed);
    assert!(report.results[0].messages[0].contains("configuration error"));
}

/// A missing steps file is an error, not an empty run.
#[tokio::test]
async fn test_run_steps_missing_file() {
    let config = Config {
        file: std::path::PathBuf::from("/nonexistent/steps.json"),
        ..Config::default()
    };
    let err = run_steps(config).await.expect_err("run should fail");
    assert!(err.to_string().contains("Failed to read steps file"));
}
