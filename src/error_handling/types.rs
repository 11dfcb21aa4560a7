//! Error type definitions.
//!
//! This module defines the error kinds used throughout the step pipeline and
//! the initialization errors raised while setting up the runner.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Typed failure from the extractor seam.
///
/// Raised when a value cannot be pulled out of a request or response: the
/// source location is not extractable, the extraction method is unknown, or
/// the expression does not resolve against the data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The `from` location cannot serve as an extraction source.
    #[error("cannot extract from location '{0}'")]
    UnsupportedSource(String),

    /// The extraction method is not one the extractor implements.
    #[error("unsupported extraction method '{0}'")]
    UnsupportedMethod(String),

    /// The expression is well-formed but matched nothing in the data.
    #[error("expression '{expression}' matched nothing")]
    NoMatch {
        /// The expression that failed to match.
        expression: String,
    },

    /// The expression could not be parsed or compiled.
    #[error("invalid expression '{expression}': {reason}")]
    InvalidExpression {
        /// The offending expression.
        expression: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Fatal error kinds that abort a step.
///
/// Extraction errors are fatal only in the dependency-extraction phase;
/// during assertion evaluation they degrade to a failing assertion message
/// and never surface as a `StepError`.
#[derive(Error, Debug)]
pub enum StepError {
    /// Network or HTTP-level failure from the transport. Propagated
    /// unmodified; no retry is attempted at this layer.
    #[error("transport error: {0}")]
    Transport(#[from] ReqwestError),

    /// A relation's value could not be extracted. Dependent steps need the
    /// extracted value, so the step aborts rather than continue silently.
    #[error(transparent)]
    Extraction(#[from] ExtractError),

    /// The step specification itself is unusable (bad method, unreadable
    /// upload file, relation pointing at an unknown location).
    #[error("configuration error: {0}")]
    Configuration(String),
}
