//! Run initialization and resource setup.
//!
//! This module provides functions to initialize the shared resources a run
//! needs: the logger and the HTTP session/clients. All initialization
//! functions return proper error types for error handling.

mod client;
mod logger;

pub use client::{build_client, init_session, ClientConfig};
pub use logger::init_logger_with;
