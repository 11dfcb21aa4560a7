//! HTTP sessions and the four dispatch strategies.
//!
//! A [`Session`] is the long-lived handle the caller owns across a run.
//! [`dispatch`] decides, per step, whether the call reuses that session,
//! runs against a deep copy of it, or gets a session/client of its own.

mod dispatch;
mod state;

pub use dispatch::dispatch;
pub use state::Session;
