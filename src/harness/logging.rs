//! Default logging sink.

use log::{debug, error};

use super::StepLogger;

/// [`StepLogger`] that forwards to the `log` crate facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogFacade;

impl LogFacade {
    /// Creates the facade.
    pub fn new() -> Self {
        Self
    }
}

impl StepLogger for LogFacade {
    fn debug_log(&self, message: &str) {
        debug!("{message}");
    }

    fn error_log(&self, message: &str) {
        error!("{message}");
    }
}
