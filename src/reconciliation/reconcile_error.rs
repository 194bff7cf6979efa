use thiserror::Error;

use crate::{
    diffs::diff_error::DiffError,
    reconciliation::{document_error::DocumentError, session::SessionId},
};

/// Error type for the streaming reconciler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error(transparent)]
    Diff(#[from] DiffError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The handle doesn't belong to this reconciler
    #[error("Unknown reconciliation {0}")]
    UnknownSession(SessionId),

    /// Input handed over from outside Rust was not usable
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
