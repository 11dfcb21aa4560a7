//! Error handling for the step pipeline.
//!
//! Error kinds follow the pipeline's propagation policy:
//! - **Transport**: network/HTTP failure, propagates to the caller and
//!   aborts the step; retry policy (if any) belongs to the transport.
//! - **Extraction**: recoverable inside assertion evaluation (degrades to a
//!   failing assertion message), fatal inside dependency extraction.
//! - **Configuration**: malformed step specification, always fatal.

mod types;

// Re-export public API
pub use types::{ExtractError, InitializationError, StepError};
