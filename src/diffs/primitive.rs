use std::fmt::Debug;

use crate::diffs::{diff_error::DiffError, diff_op::DiffOp};

/// A minimal edit script algorithm over character sequences.
///
/// Implementations must return operations that reconstruct both inputs: the
/// `Equal` and `Delete` texts concatenate to `old`, the `Equal` and `Insert`
/// texts to `new`. `cleanup_semantic` may merge or drop fragments but must
/// keep that property.
pub trait DiffPrimitive: Debug {
    fn diff_main(&self, old: &str, new: &str) -> Result<Vec<DiffOp>, DiffError>;

    fn cleanup_semantic(&self, operations: &mut Vec<DiffOp>);

    /// Diffs the two texts and cleans the result up.
    fn diff(&self, old: &str, new: &str) -> Result<Vec<DiffOp>, DiffError> {
        let mut operations = self.diff_main(old, new)?;
        self.cleanup_semantic(&mut operations);

        Ok(operations)
    }
}

/// Diff primitive backed by `dissimilar`, a port of diff-match-patch whose
/// output already went through semantic cleanup. Never fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SemanticDiff;

impl SemanticDiff {
    /// Infallible version of `DiffPrimitive::diff`.
    #[must_use]
    pub fn compute(old: &str, new: &str) -> Vec<DiffOp> {
        let mut operations: Vec<DiffOp> = dissimilar::diff(old, new)
            .into_iter()
            .map(DiffOp::from)
            .collect();
        merge_adjacent(&mut operations);

        operations
    }
}

impl DiffPrimitive for SemanticDiff {
    fn diff_main(&self, old: &str, new: &str) -> Result<Vec<DiffOp>, DiffError> {
        Ok(dissimilar::diff(old, new)
            .into_iter()
            .map(DiffOp::from)
            .collect())
    }

    fn cleanup_semantic(&self, operations: &mut Vec<DiffOp>) { merge_adjacent(operations); }
}

/// Drops empty operations and joins neighbours of the same kind.
fn merge_adjacent(operations: &mut Vec<DiffOp>) {
    let mut merged: Vec<DiffOp> = Vec::with_capacity(operations.len());

    for operation in operations.drain(..) {
        if operation.text().is_empty() {
            continue;
        }

        match merged.pop() {
            Some(previous) => match previous.join(operation) {
                Ok(joined) => merged.push(joined),
                Err((previous, operation)) => {
                    merged.push(previous);
                    merged.push(operation);
                }
            },
            None => merged.push(operation),
        }
    }

    *operations = merged;
}
