use thiserror::Error;

use crate::reconciliation::document::NodeId;

/// Error type for invalid document tree mutations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// The node was removed from the document or never belonged to it
    #[error("Node {0} does not exist in the document")]
    UnknownNode(NodeId),

    /// The root can't be replaced or removed
    #[error("Node {0} has no parent")]
    Detached(NodeId),

    /// The selection doesn't fit in the document
    #[error(
        "Invalid selection: characters {start}..{end} requested, but the document only has \
         {length} characters"
    )]
    OutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    /// The selection touches text that is already being reconciled
    #[error("Characters {start}..{end} overlap a reconciliation in progress")]
    RegionBusy { start: usize, end: usize },
}
