//! Error types for action-core
//!
//! Each stage of the execute pipeline owns one failure kind, so a caller can
//! always tell malformed input, a failing handler, and malformed output
//! apart. Registry failures sit alongside them.

use thiserror::Error;
use tuple_schema::Issues;

/// Result type alias for action-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failures surfaced by actions and their registry
#[derive(Error, Debug)]
pub enum Error {
    /// The raw data parameters failed arity or per-element rules
    #[error("Input validation failed for '{event}': {issues}")]
    InputValidation {
        /// Qualified event name
        event: String,
        /// Every issue found, located by path
        issues: Issues,
    },

    /// The handler itself failed after receiving valid input
    #[error("Handler for '{event}' failed: {source}")]
    Handler {
        /// Qualified event name
        event: String,
        /// Underlying handler failure
        #[source]
        source: anyhow::Error,
    },

    /// The handler returned values that failed the declared output rules
    #[error("Output validation failed for '{event}': {issues}")]
    OutputValidation {
        /// Qualified event name
        event: String,
        /// Every issue found, located by path
        issues: Issues,
    },

    /// An acknowledgment callback appeared somewhere other than the final
    /// parameter position
    #[error("Acknowledgment callback at position {position} of '{event}' is not the final parameter")]
    AcknowledgmentType {
        /// Qualified event name
        event: String,
        /// Zero-based position of the offending parameter
        position: usize,
    },

    /// An action with the same namespace and event is already registered
    #[error("Action '{event}' already registered in namespace '{namespace}'")]
    DuplicateAction {
        /// Namespace path
        namespace: String,
        /// Event name
        event: String,
    },

    /// No action is registered for the namespace and event
    #[error("No action registered for '{event}' in namespace '{namespace}'")]
    ActionNotFound {
        /// Namespace path
        namespace: String,
        /// Event name
        event: String,
    },
}

impl Error {
    /// Create an input validation error
    pub fn input_validation(event: impl Into<String>, issues: Issues) -> Self {
        Self::InputValidation {
            event: event.into(),
            issues,
        }
    }

    /// Create a handler error
    pub fn handler(event: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Handler {
            event: event.into(),
            source,
        }
    }

    /// Create an output validation error
    pub fn output_validation(event: impl Into<String>, issues: Issues) -> Self {
        Self::OutputValidation {
            event: event.into(),
            issues,
        }
    }

    /// Create an acknowledgment type error
    pub fn acknowledgment_type(event: impl Into<String>, position: usize) -> Self {
        Self::AcknowledgmentType {
            event: event.into(),
            position,
        }
    }

    /// Create a duplicate action error
    pub fn duplicate_action(namespace: impl Into<String>, event: impl Into<String>) -> Self {
        Self::DuplicateAction {
            namespace: namespace.into(),
            event: event.into(),
        }
    }

    /// Create an action not found error
    pub fn not_found(namespace: impl Into<String>, event: impl Into<String>) -> Self {
        Self::ActionNotFound {
            namespace: namespace.into(),
            event: event.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use tuple_schema::{Issue, Path};

    #[test]
    fn display_names_the_failure_domain() {
        let issues = Issues::new(vec![Issue::new(
            Path::root().index(0),
            "expected string, found number",
        )]);
        let err = Error::input_validation("/#send", issues);
        assert_eq!(
            err.to_string(),
            "Input validation failed for '/#send': $[0]: expected string, found number"
        );

        let err = Error::acknowledgment_type("/#send", 1);
        assert_eq!(
            err.to_string(),
            "Acknowledgment callback at position 1 of '/#send' is not the final parameter"
        );
    }

    #[test]
    fn handler_errors_expose_their_source() {
        let err = Error::handler("/#send", anyhow::anyhow!("database unavailable"));
        assert_eq!(
            err.to_string(),
            "Handler for '/#send' failed: database unavailable"
        );
        assert!(err.source().is_some());
    }
}
