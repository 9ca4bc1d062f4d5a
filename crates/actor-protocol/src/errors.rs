//! Error Handling Guidelines
//!
//! All error messages should follow this format:
//!
//! 1. **What failed**: Describe the operation that failed
//! 2. **Why it failed**: Provide the root cause if known
//! 3. **What to do**: Suggest user action when possible
//!
//! Examples:
//! - ✅ "Failed to send step 3: link is not open. Reconnect and press Play again."
//! - ❌ "Send failed" (lacks context and action)

use thiserror::Error;

/// Unified error type for Worker Loop operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ActorError {
    /// Actor received an unexpected message in current state
    #[error("Unexpected message in state {state}: {message}")]
    UnexpectedMessage { state: String, message: String },

    /// Outgoing or incoming frame could not be processed
    #[error("Frame error: {0}")]
    Frame(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<String> for ActorError {
    fn from(s: String) -> Self {
        ActorError::Other(s)
    }
}

impl From<&str> for ActorError {
    fn from(s: &str) -> Self {
        ActorError::Other(s.to_string())
    }
}
