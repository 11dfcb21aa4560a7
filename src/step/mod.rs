//! Step execution pipeline.
//!
//! A step runs through a fixed sequence: build the request from its
//! spec, dispatch it under the session policy the controller selects,
//! capture and log the response, evaluate assertions, and extract
//! dependency values for later steps. [`execute`] drives the whole
//! sequence; the submodules own the individual phases.

pub mod check;
pub mod logging;
pub mod relations;
pub mod request;
pub mod response;

use std::sync::Arc;
use std::time::Duration;

use crate::assertion::{Comparer, DefaultComparer};
use crate::context::ExecutionContext;
use crate::error_handling::StepError;
use crate::extract::{Extractor, PathExtractor};
use crate::harness::{DurationRecorder, LogFacade, StepLogger, TransactionStats};
use crate::initialization::ClientConfig;
use crate::session::{dispatch, Session};
use crate::spec::StepSpec;

pub use check::AssertResult;
pub use request::BuiltRequest;
pub use response::{capture, CapturedResponse, ResponseBody};

/// Shared services a step runs with.
///
/// The trait objects default to the production implementations; tests
/// swap in capturing fakes.
#[derive(Clone)]
pub struct StepContext {
    /// Sink for step logging.
    pub logger: Arc<dyn StepLogger>,
    /// Sink for request durations.
    pub recorder: Arc<dyn DurationRecorder>,
    /// Value extraction engine for assertions and relations.
    pub extractor: Arc<dyn Extractor>,
    /// Assertion comparison engine.
    pub comparer: Arc<dyn Comparer>,
    /// Settings applied when a step needs a fresh HTTP client.
    pub client_config: ClientConfig,
}

impl StepContext {
    /// Production wiring around the given client settings.
    pub fn new(client_config: ClientConfig) -> Self {
        Self {
            logger: Arc::new(LogFacade::new()),
            recorder: Arc::new(TransactionStats::new()),
            extractor: Arc::new(PathExtractor::new()),
            comparer: Arc::new(DefaultComparer::new()),
            client_config,
        }
    }
}

impl Default for StepContext {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

/// What a completed step leaves behind.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// The captured response.
    pub response: CapturedResponse,
    /// The assertion verdict.
    pub assert_result: AssertResult,
}

impl StepResult {
    /// Whether every evaluated assertion passed.
    pub fn passed(&self) -> bool {
        self.assert_result.passed
    }
}

/// Executes one step end to end.
///
/// The banners and the post-step pause run on every exit path, so a
/// transport failure still closes the step the same way a passing run
/// does.
///
/// # Errors
///
/// Returns an error when the request cannot be built or dispatched, or
/// when a relation fails to extract. Assertion failures are not errors;
/// they land in the returned [`StepResult`].
pub async fn execute(
    spec: &StepSpec,
    session: &mut Session,
    context: &mut ExecutionContext,
    step_context: &StepContext,
) -> Result<StepResult, StepError> {
    logging::log_step_started(&spec.id, &spec.name, step_context.logger.as_ref());
    let outcome = run_step(spec, session, context, step_context).await;
    if let Err(error) = &outcome {
        step_context.logger.error_log(&format!(
            "[{}][{}] step failed: {error}",
            spec.id, spec.name
        ));
    }
    logging::log_step_finished(&spec.id, &spec.name, step_context.logger.as_ref());
    sleep_after(spec, step_context.logger.as_ref()).await;
    outcome
}

async fn run_step(
    spec: &StepSpec,
    session: &mut Session,
    context: &mut ExecutionContext,
    step_context: &StepContext,
) -> Result<StepResult, StepError> {
    let built = request::build(spec)?;
    logging::log_request(&built, step_context.logger.as_ref());

    let raw = dispatch(
        &built,
        &spec.controller,
        session,
        &step_context.client_config,
        step_context.logger.as_ref(),
        step_context.recorder.as_ref(),
    )
    .await?;

    let captured = response::capture(raw).await?;
    logging::log_response(&captured, step_context.logger.as_ref());

    let assert_result = check::evaluate(
        spec,
        &captured,
        step_context.extractor.as_ref(),
        step_context.comparer.as_ref(),
    );
    if assert_result.passed {
        relations::extract_relations(
            spec,
            &built,
            &captured,
            step_context.extractor.as_ref(),
            context,
        )?;
    }

    Ok(StepResult {
        response: captured,
        assert_result,
    })
}

async fn sleep_after(spec: &StepSpec, logger: &dyn StepLogger) {
    let seconds = spec.controller.sleep_after_run;
    if seconds > 0 {
        tokio::time::sleep(Duration::from_secs(seconds)).await;
        logger.debug_log(&format!("waited {seconds}s after step"));
    }
}
