//! Declarative step specifications.
//!
//! Everything a loader hands the pipeline lives here: the request shape,
//! the controller flags that pick a session strategy, and the assertion
//! and relation entries. Deserialization is deliberately forgiving about
//! scalar types (stringy booleans, numeric ids) but rejects values it
//! cannot normalize, so bad specs fail at load time rather than mid-step.

mod body;
mod checks;
mod controller;
mod step;

pub use body::BodyType;
pub use checks::{AssertSource, AssertionSpec, RelationSource, RelationSpec};
pub use controller::{Controller, SessionStrategy};
pub use step::{FilePart, RequestOptions, StepSpec};
