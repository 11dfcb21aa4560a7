//! Configuration constants.
//!
//! This module defines the operational constants used throughout the crate:
//! logging caps, default assertion values, and client defaults.

/// Maximum serialized payload length shown in debug logs, in characters.
///
/// Request and response payloads longer than this are replaced by a
/// length-only placeholder so a single large body cannot flood the log.
pub const MAX_LOG_VALUE_CHARS: usize = 15000;

/// Status code checked by the synthesized default assertion.
///
/// A step with no assertion entries gets exactly one implicit check:
/// status code equals this value.
pub const DEFAULT_EXPECT_STATUS: u16 = 200;

/// Default per-request timeout in seconds.
///
/// Applied to every client the runner builds (the shared session client and
/// the dedicated clients used by the fresh/stateless session modes). A hung
/// request blocks its step until this timeout fires; there is no separate
/// step-level timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent header value for HTTP requests.
///
/// Users can override this via the `--user-agent` CLI flag or
/// [`crate::Config::user_agent`].
pub const DEFAULT_USER_AGENT: &str = concat!("apistep/", env!("CARGO_PKG_VERSION"));
