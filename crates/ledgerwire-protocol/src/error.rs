//! Error types for description loading and validation.

use thiserror::Error;

use crate::validator::Violation;

/// Errors from loading or checking the protocol description.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o error reading protocol description: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed protocol description: {0}")]
    Json(#[from] serde_json::Error),

    /// The description disagrees with the compiled tables. Carries every
    /// mismatch found, not just the first.
    #[error("protocol description is inconsistent: {} violation(s)", violations.len())]
    Inconsistent { violations: Vec<Violation> },
}
