//! Crate-wide error taxonomy.
//!
//! Three of the four error categories this crate distinguishes are
//! represented here; the fourth (assertion failures) is a Rust panic and
//! deliberately has no `Error` variant, since a violated internal invariant
//! is a programming bug, not a recoverable condition.

use thiserror::Error;

/// Domain, structural, or validation failure surfaced by a public
/// constructor or operation.
#[derive(Debug, Error)]
pub enum Lmi7702Error {
    /// An input scalar or vector violated a precondition the crate cannot
    /// silently coerce around (out-of-range probability, negative duration,
    /// non-finite rate, ...).
    #[error("domain error: {message}")]
    Domain { message: String },

    /// Mismatched vector lengths, or a corrupt/unrecognized actuarial-table
    /// byte stream.
    #[error("structural error: {message}")]
    Structural { message: String },

    /// Cross-field validation performed by `garde`.
    #[error("validation failed: {0}")]
    Validation(#[from] garde::Report),
}

impl Lmi7702Error {
    pub fn domain(message: impl Into<String>) -> Self {
        Self::Domain {
            message: message.into(),
        }
    }

    pub fn structural(message: impl Into<String>) -> Self {
        Self::Structural {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Lmi7702Error>;
