//! Session state.

use std::collections::{BTreeMap, HashMap};

/// A reusable HTTP session: a client plus explicit cookie state.
///
/// Cookies live in the session rather than in a client-level cookie store
/// so the four dispatch strategies can share, deep-copy, or discard them
/// explicitly. `Clone` copies the cookie map; the underlying client is
/// shared by the clone, which shares connection pooling only, not any
/// observable protocol state.
#[derive(Debug, Clone)]
pub struct Session {
    client: reqwest::Client,
    cookies: BTreeMap<String, String>,
}

impl Session {
    /// Wraps a client with empty cookie state.
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            cookies: BTreeMap::new(),
        }
    }

    /// The session's HTTP client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Stored cookies, ordered by name.
    pub fn cookies(&self) -> &BTreeMap<String, String> {
        &self.cookies
    }

    /// Sets one cookie, replacing any prior value.
    pub fn set_cookie(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.cookies.insert(name.into(), value.into());
    }

    /// Renders the `Cookie` header for one call.
    ///
    /// Per-call cookies are merged over the session's; on a name collision
    /// the per-call value wins. Returns `None` when there is nothing to
    /// send.
    pub fn cookie_header(&self, per_call: Option<&HashMap<String, String>>) -> Option<String> {
        let mut merged = self.cookies.clone();
        if let Some(extra) = per_call {
            for (name, value) in extra {
                merged.insert(name.clone(), value.clone());
            }
        }
        if merged.is_empty() {
            return None;
        }
        let header = merged
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Some(header)
    }

    /// Absorbs `Set-Cookie` values from a response into this session.
    pub fn absorb(&mut self, response: &reqwest::Response) {
        for cookie in response.cookies() {
            self.cookies
                .insert(cookie.name().to_string(), cookie.value().to_string());
        }
    }
}
