//! Capability error types.

use thiserror::Error;

/// Failure reported by a [`Player`](crate::player::Player) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerError {
    /// The player rejected the requested operation.
    #[error("player rejected {operation}: {reason}")]
    Rejected {
        /// The operation that was rejected (`pause`, `seek`, ...).
        operation: &'static str,
        /// Reason given by the player.
        reason: String,
    },

    /// The player never became usable (failed to load, timed out, ...).
    #[error("player unavailable: {0}")]
    Unavailable(String),
}

impl PlayerError {
    /// Shorthand for a [`PlayerError::Rejected`].
    #[must_use]
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display_names_operation_and_reason() {
        let err = PlayerError::rejected("seek", "out of range");
        assert_eq!(err.to_string(), "player rejected seek: out of range");
    }

    #[test]
    fn test_unavailable_display() {
        let err = PlayerError::Unavailable("embed blocked".into());
        assert_eq!(err.to_string(), "player unavailable: embed blocked");
    }
}
