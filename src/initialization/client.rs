//! HTTP client and session initialization.
//!
//! Every client the pipeline uses is built here: the run's shared session
//! client and the dedicated clients the fresh/stateless dispatch modes
//! create per call.

use std::collections::HashMap;
use std::time::Duration;

use reqwest::{ClientBuilder, Proxy};

use crate::config::{Config, DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::error_handling::InitializationError;
use crate::session::Session;

/// Connection settings applied to every client the pipeline builds.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Per-request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_seconds),
            user_agent: config.user_agent.clone(),
        }
    }
}

/// Builds a client, honoring a step's proxy mapping when given.
///
/// Proxy keys are schemes: `http` and `https` scope the proxy to that
/// scheme, anything else proxies all traffic.
///
/// # Errors
///
/// Returns a `reqwest::Error` if a proxy URL is malformed or client
/// creation fails.
pub fn build_client(
    config: &ClientConfig,
    proxies: Option<&HashMap<String, String>>,
) -> Result<reqwest::Client, reqwest::Error> {
    let mut builder = ClientBuilder::new()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone());
    if let Some(proxies) = proxies {
        for (scheme, target) in proxies {
            let proxy = match scheme.to_ascii_lowercase().as_str() {
                "http" => Proxy::http(target)?,
                "https" => Proxy::https(target)?,
                _ => Proxy::all(target)?,
            };
            builder = builder.proxy(proxy);
        }
    }
    builder.build()
}

/// Initializes the run's shared session.
///
/// # Errors
///
/// Returns `InitializationError::HttpClientError` if client creation fails.
pub fn init_session(config: &ClientConfig) -> Result<Session, InitializationError> {
    let client = build_client(config, None)?;
    Ok(Session::new(client))
}
