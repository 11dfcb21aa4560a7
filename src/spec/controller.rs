//! Step controller flags and session strategy selection.

use serde::de::{Deserializer, Error as DeError};
use serde::Deserialize;

/// Execution flags attached to a step.
///
/// Loaders hand these over in whatever scalar form the authoring tool used,
/// so the boolean flags accept JSON booleans, 0/1 numbers, and the usual
/// truthy strings, and the sleep durations accept numeric strings. Anything
/// else is rejected when the spec is deserialized rather than deep inside
/// dispatch.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Controller {
    /// Run the call through the shared session.
    #[serde(deserialize_with = "truthy")]
    pub use_session: bool,
    /// Persist state produced by the call.
    #[serde(deserialize_with = "truthy")]
    pub save_session: bool,
    /// Seconds to wait before dispatch.
    #[serde(deserialize_with = "loose_seconds")]
    pub sleep_before_run: u64,
    /// Seconds to wait after the step body finishes, on all exit paths.
    #[serde(deserialize_with = "loose_seconds")]
    pub sleep_after_run: u64,
}

impl Default for Controller {
    fn default() -> Self {
        Self {
            use_session: false,
            save_session: false,
            sleep_before_run: 0,
            sleep_after_run: 0,
        }
    }
}

impl Controller {
    /// Resolves the two session flags into one of the four strategies.
    pub fn strategy(&self) -> SessionStrategy {
        match (self.use_session, self.save_session) {
            (true, true) => SessionStrategy::SharedPersist,
            (true, false) => SessionStrategy::SharedIsolated,
            (false, true) => SessionStrategy::FreshDiscarded,
            (false, false) => SessionStrategy::Stateless,
        }
    }
}

/// The four session-reuse policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStrategy {
    /// Reuse the shared session; cookies set by the call persist into it.
    SharedPersist,
    /// Run against a deep copy of the shared session; nothing propagates
    /// back.
    SharedIsolated,
    /// Build a brand-new session for this call and discard it afterwards.
    /// Observably identical to [`SessionStrategy::Stateless`]; kept as its
    /// own variant because the flag combination selects it explicitly.
    FreshDiscarded,
    /// One-off request with no session at all.
    Stateless,
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Int(i64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => Ok(b),
        Raw::Int(0) => Ok(false),
        Raw::Int(1) => Ok(true),
        Raw::Int(other) => Err(D::Error::custom(format!(
            "boolean flag must be 0 or 1, got {other}"
        ))),
        Raw::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" | "" => Ok(false),
            _ => Err(D::Error::custom(format!("not a boolean flag: '{s}'"))),
        },
    }
}

fn loose_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Text(String),
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u64>()
                .map_err(|_| D::Error::custom(format!("not a duration in seconds: '{s}'")))
        }
    }
}
