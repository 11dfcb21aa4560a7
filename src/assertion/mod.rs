//! Assertion comparison.
//!
//! The evaluator hands each (kind, actual, expected) triple to a
//! [`Comparer`]; the crate's [`DefaultComparer`] implements the built-in
//! comparison kinds. The trait is infallible on purpose: an unusable kind
//! or incomparable pair is reported as a failed comparison with an
//! explanatory message, never as an error that could abort the step.

use serde_json::Value;

mod compare;

pub use compare::{Comparison, DefaultComparer};

/// Compares an actual value against an expected one.
pub trait Comparer: Send + Sync {
    /// Runs the comparison named by `kind`, returning pass/fail and a
    /// human-readable message describing the outcome.
    fn compare(&self, kind: &str, actual: &Value, expect: &str) -> (bool, String);
}
