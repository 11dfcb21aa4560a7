//! Request body encoding tag.

use serde::{Deserialize, Serialize};

/// How the step's body payload is encoded before dispatch.
///
/// Unrecognized tags fall back to [`BodyType::Raw`]: the body is passed
/// through untouched and request-body extraction reads the `data` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BodyType {
    /// JSON body, sent from the `json` option.
    #[default]
    Json,
    /// Flat key/value body percent-encoded into a single string at build
    /// time.
    FormUrlencoded,
    /// Anything else; the `data` option is sent as-is.
    #[serde(other)]
    Raw,
}

impl BodyType {
    /// Wire name of the tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            BodyType::Json => "json",
            BodyType::FormUrlencoded => "form-urlencoded",
            BodyType::Raw => "raw",
        }
    }
}
