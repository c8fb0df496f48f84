//! Invocation logging
//!
//! Logging is a capability handed through the pipeline rather than a global:
//! the transport decides what an invocation logs to, and tests swap in
//! recorders. The pipeline guarantees every failed run is reported through
//! [`ActionLogger::error`] exactly once, with the same error the caller gets
//! back, so hosts never double-report.

use tracing::{debug, error};

use crate::error::Error;

/// Logging capability for action invocations.
pub trait ActionLogger: Send + Sync {
    /// Record a failed pipeline run. Called exactly once per failure, with
    /// the error that `execute` then returns.
    fn error(&self, err: &Error);

    /// Trace a pipeline stage. Silent unless the host surfaces debug output.
    fn debug(&self, message: &str);
}

/// Default logger forwarding to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ActionLogger for TracingLogger {
    fn error(&self, err: &Error) {
        error!("{}", err);
    }

    fn debug(&self, message: &str) {
        debug!("{}", message);
    }
}
