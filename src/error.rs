//! Error types shared across the state core.
//!
//! Cancellation is intentionally absent from this taxonomy: cancelled work
//! is aborted at its next suspension point and never produces a `Result`,
//! so it can never reach an error slice or an error-severity log line.

use thiserror::Error;

/// Failures that can reach a screen's error slice.
///
/// `NotAuthenticated` is a guard condition rather than a fault; operations
/// that hit it short-circuit to an empty result and it is only constructed
/// where a collaborator insists on reporting it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Connection-level failure talking to a remote service.
    #[error("network error: {0}")]
    Network(String),

    /// The remote service answered with an error status.
    #[error("service error {status}: {message}")]
    Service { status: u16, message: String },

    /// The session has no authenticated user.
    #[error("not signed in")]
    NotAuthenticated,
}

impl SyncError {
    /// Short user-facing message for the error slice.
    pub fn user_message(&self) -> &'static str {
        match self {
            SyncError::Network(_) => "Couldn't reach the server",
            SyncError::Service { .. } => "Something went wrong, try again",
            SyncError::NotAuthenticated => "Sign in to continue",
        }
    }
}

/// The observed store was dropped while a subscriber was waiting on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("state store closed")]
pub struct StoreClosed;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = SyncError::Service {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "service error 502: bad gateway");
    }

    #[test]
    fn user_message_is_stable() {
        assert_eq!(
            SyncError::Network("dns".into()).user_message(),
            "Couldn't reach the server"
        );
        assert_eq!(
            SyncError::NotAuthenticated.user_message(),
            "Sign in to continue"
        );
    }
}
