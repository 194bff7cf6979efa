use thiserror::Error;

/// Error type for failures of the underlying diff primitive
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiffError {
    /// The primitive couldn't produce an edit script for the given texts
    #[error("Diff primitive failed: {reason}")]
    PrimitiveFailed {
        /// Human-readable description reported by the primitive
        reason: String,
    },
}
