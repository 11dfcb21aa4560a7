//! Collaborator seams for logging and metrics.
//!
//! The pipeline reports through these traits instead of calling a logger
//! or metrics sink directly, so embedding systems (test runners, report
//! collectors) can route step output wherever they need. Both are
//! fire-and-forget: implementations must not fail the step.

mod logging;
mod timing;

pub use logging::LogFacade;
pub use timing::TransactionStats;

/// Sink for the step's debug and error lines.
pub trait StepLogger: Send + Sync {
    /// Emits a debug-level line.
    fn debug_log(&self, message: &str);
    /// Emits an error-level line.
    fn error_log(&self, message: &str);
}

/// Sink for request wall-clock durations.
pub trait DurationRecorder: Send + Sync {
    /// Records one dispatch duration in milliseconds.
    fn record_duration(&self, millis: u64);
}
