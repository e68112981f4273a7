//! Result and error types for Tantear.

use std::time::Duration;
use thiserror::Error;

/// Result type for Tantear operations
pub type TantearResult<T> = Result<T, TantearError>;

/// Errors that can occur in Tantear
#[derive(Debug, Error)]
pub enum TantearError {
    /// Element never satisfied the wait predicate within the budget
    #[error("wait for {locator} timed out after {waited:?}")]
    WaitTimeout {
        /// Description of the locator being waited on
        locator: String,
        /// Time spent polling before giving up
        waited: Duration,
    },

    /// Element absent from the UI tree (distinct from present-but-hidden)
    #[error("no such element: {locator}")]
    NoSuchElement {
        /// Description of the locator that matched nothing
        locator: String,
    },

    /// Scenario expectation violated
    #[error("assertion failed: {message}")]
    Assertion {
        /// Error message
        message: String,
    },

    /// HTTP call to the service under test errored or returned garbage
    #[error("external service failure: {message}")]
    ExternalService {
        /// Error message
        message: String,
    },

    /// Driver session could not be created, commanded, or torn down
    #[error("session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Remote driver returned an error payload
    #[error("driver protocol error ({status}): {message}")]
    Protocol {
        /// HTTP status of the driver response
        status: u16,
        /// Error code and message from the driver payload
        message: String,
    },

    /// Screenshot capture failed
    #[error("screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl TantearError {
    /// Whether this error is one a soft existence check swallows into `false`.
    ///
    /// Timeout and absence are expected outcomes of probing for an element
    /// that is not there; everything else is a real failure.
    #[must_use]
    pub const fn is_absence(&self) -> bool {
        matches!(
            self,
            Self::WaitTimeout { .. } | Self::NoSuchElement { .. }
        )
    }

    /// Build an assertion failure from a message.
    #[must_use]
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Build a session failure from a message.
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }
}
