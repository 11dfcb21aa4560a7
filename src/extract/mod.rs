//! Value extraction from request and response data.
//!
//! Assertions and relations both locate values through the [`Extractor`]
//! trait, so deployments can swap in their own path engine. The crate ships
//! [`PathExtractor`], which handles `jsonpath` and `regex` expressions.

use serde_json::Value;

use crate::error_handling::ExtractError;

mod method;
mod path;

pub use method::ExtractMethod;
pub use path::PathExtractor;

/// Resolves an expression against a JSON document.
///
/// Implementations must not mutate the input data; callers rely on the
/// document being byte-identical before and after extraction.
pub trait Extractor: Send + Sync {
    /// Evaluates `expression` against `data` using `method`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] when the method is unsupported, the
    /// expression is malformed, or nothing matches.
    fn extract(
        &self,
        method: &ExtractMethod,
        data: &Value,
        expression: &str,
    ) -> Result<Value, ExtractError>;
}
