//! apistep library: declarative HTTP API test-step execution.
//!
//! A step is described as data (method, URL, request options, session
//! controls, assertions, relations), executed against a live endpoint,
//! judged by its assertions, and mined for values later steps depend
//! on.
//!
//! # Example
//!
//! ```no_run
//! use apistep::{run_steps, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("steps.json"),
//!     ..Config::default()
//! };
//!
//! let report = run_steps(config).await?;
//! println!(
//!     "{} steps: {} passed, {} failed",
//!     report.total_steps, report.passed, report.failed
//! );
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod assertion;
pub mod config;
pub mod context;
pub mod error_handling;
pub mod extract;
pub mod harness;
pub mod initialization;
pub mod session;
pub mod spec;
pub mod step;

pub use config::{Config, LogFormat, LogLevel};
pub use context::{ContextValue, ExecutionContext};
pub use error_handling::{ExtractError, StepError};
pub use run::{run_steps, RunReport};
pub use session::Session;
pub use spec::StepSpec;
pub use step::{execute, AssertResult, StepContext, StepResult};

mod run {
    //! Batch execution of a steps file.

    use std::sync::Arc;
    use std::time::Instant;

    use anyhow::{Context as _, Result};
    use log::{info, warn};

    use crate::config::Config;
    use crate::context::ExecutionContext;
    use crate::harness::TransactionStats;
    use crate::initialization::{init_session, ClientConfig};
    use crate::spec::StepSpec;
    use crate::step::{self, AssertResult, StepContext};

    /// Summary of one batch run.
    #[derive(Debug)]
    pub struct RunReport {
        /// Number of steps in the file.
        pub total_steps: usize,
        /// Steps whose assertions all passed.
        pub passed: usize,
        /// Steps that failed an assertion or aborted with an error.
        pub failed: usize,
        /// Wall-clock duration of the whole run.
        pub elapsed_seconds: f64,
        /// Per-step verdicts, in file order.
        pub results: Vec<AssertResult>,
    }

    /// Runs every step in the configured file, in order, sharing one
    /// session and one execution context.
    ///
    /// A step that aborts (transport error, bad configuration) is
    /// counted as failed and the run continues with the next step.
    ///
    /// # Errors
    ///
    /// Returns an error when the steps file cannot be read or parsed,
    /// or when the HTTP session cannot be initialized.
    pub async fn run_steps(config: Config) -> Result<RunReport> {
        let started = Instant::now();

        let raw = tokio::fs::read(&config.file)
            .await
            .with_context(|| format!("Failed to read steps file {}", config.file.display()))?;
        let specs: Vec<StepSpec> = serde_json::from_slice(&raw)
            .with_context(|| format!("Failed to parse steps file {}", config.file.display()))?;
        info!("Loaded {} steps from {}", specs.len(), config.file.display());

        let client_config = ClientConfig::from(&config);
        let stats = Arc::new(TransactionStats::new());
        let mut step_context = StepContext::new(client_config.clone());
        step_context.recorder = stats.clone();

        let mut session =
            init_session(&client_config).context("Failed to initialize HTTP session")?;
        let mut context = ExecutionContext::new();

        let mut passed = 0usize;
        let mut failed = 0usize;
        let mut results = Vec::with_capacity(specs.len());

        for spec in &specs {
            match step::execute(spec, &mut session, &mut context, &step_context).await {
                Ok(result) => {
                    if result.passed() {
                        passed += 1;
                    } else {
                        failed += 1;
                        for message in &result.assert_result.messages {
                            warn!("[{}][{}] {}", spec.id, spec.name, message);
                        }
                    }
                    results.push(result.assert_result);
                }
                Err(error) => {
                    failed += 1;
                    warn!("[{}][{}] step aborted: {}", spec.id, spec.name, error);
                    results.push(AssertResult {
                        step_id: spec.id.clone(),
                        step_name: spec.name.clone(),
                        passed: false,
                        messages: vec![error.to_string()],
                    });
                }
            }
        }

        if config.show_timing {
            stats.log_summary();
        }

        Ok(RunReport {
            total_steps: specs.len(),
            passed,
            failed,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            results,
        })
    }
}
