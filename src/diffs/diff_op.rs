use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Text editing operation produced by a diff, in document order.
///
/// Concatenating the text of every `Equal` and `Insert` gives the new text,
/// concatenating every `Equal` and `Delete` gives the old one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "text", rename_all = "camelCase")
)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOp {
    Equal(String),
    Insert(String),
    Delete(String),
}

impl DiffOp {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            DiffOp::Equal(text) | DiffOp::Insert(text) | DiffOp::Delete(text) => text,
        }
    }

    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            DiffOp::Equal(text) | DiffOp::Insert(text) | DiffOp::Delete(text) => text,
        }
    }

    /// Length of the operation's text in characters.
    #[must_use]
    pub fn char_count(&self) -> usize { self.text().chars().count() }

    #[must_use]
    pub fn is_equal(&self) -> bool { matches!(self, DiffOp::Equal(..)) }

    #[must_use]
    pub fn is_insert(&self) -> bool { matches!(self, DiffOp::Insert(..)) }

    #[must_use]
    pub fn is_delete(&self) -> bool { matches!(self, DiffOp::Delete(..)) }

    #[must_use]
    pub fn is_same_kind(&self, other: &DiffOp) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    /// Whether the text is whitespace on a single line, e.g. the space
    /// between two words. Empty text counts as such.
    #[must_use]
    pub fn is_inline_whitespace(&self) -> bool {
        self.text()
            .chars()
            .all(|c| c.is_whitespace() && c != '\n')
    }

    /// Creates an operation of the same kind holding different text.
    #[must_use]
    pub fn with_text(&self, text: String) -> DiffOp {
        match self {
            DiffOp::Equal(..) => DiffOp::Equal(text),
            DiffOp::Insert(..) => DiffOp::Insert(text),
            DiffOp::Delete(..) => DiffOp::Delete(text),
        }
    }

    /// Extends the operation with another one of the same kind. If the kinds
    /// differ, `other` is handed back unchanged in the error.
    pub fn join(self, other: DiffOp) -> Result<DiffOp, (DiffOp, DiffOp)> {
        match (self, other) {
            (DiffOp::Equal(mut text), DiffOp::Equal(other)) => {
                text.push_str(&other);
                Ok(DiffOp::Equal(text))
            }
            (DiffOp::Insert(mut text), DiffOp::Insert(other)) => {
                text.push_str(&other);
                Ok(DiffOp::Insert(text))
            }
            (DiffOp::Delete(mut text), DiffOp::Delete(other)) => {
                text.push_str(&other);
                Ok(DiffOp::Delete(text))
            }
            (this, other) => Err((this, other)),
        }
    }
}

impl From<dissimilar::Chunk<'_>> for DiffOp {
    fn from(chunk: dissimilar::Chunk<'_>) -> Self {
        match chunk {
            dissimilar::Chunk::Equal(text) => DiffOp::Equal(text.to_owned()),
            dissimilar::Chunk::Insert(text) => DiffOp::Insert(text.to_owned()),
            dissimilar::Chunk::Delete(text) => DiffOp::Delete(text.to_owned()),
        }
    }
}

/// Rebuilds the text the operations were diffed from.
#[must_use]
pub fn old_text(operations: &[DiffOp]) -> String {
    operations
        .iter()
        .filter(|op| !op.is_insert())
        .map(DiffOp::text)
        .collect()
}

/// Rebuilds the text the operations were diffed to.
#[must_use]
pub fn new_text(operations: &[DiffOp]) -> String {
    operations
        .iter()
        .filter(|op| !op.is_delete())
        .map(DiffOp::text)
        .collect()
}
