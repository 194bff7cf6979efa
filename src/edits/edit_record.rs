#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

/// What an edit record does to the text.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Insertion,
    Deletion,
    Replacement,
    Unchanged,
}

/// Tag shared by every record derived from one diff.
#[cfg_attr(feature = "wasm", wasm_bindgen)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCategory {
    /// The diff is a single insertion into otherwise untouched text, e.g.
    /// writing a post from scratch.
    InitialContent,
    Clarity,
}

/// Semantic, reviewable description of one edit between two texts.
///
/// `replacement_text` is only present on `Replacement` records, where `text`
/// holds the removed words and `replacement_text` the added ones. The context
/// strings hold a few words of the unchanged text around the edit and are
/// empty when none could be found.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditRecord {
    id: usize,
    kind: EditKind,
    text: String,
    category: EditCategory,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    replacement_text: Option<String>,
    context_before: String,
    context_after: String,
}

impl EditRecord {
    pub(crate) fn new(
        id: usize,
        kind: EditKind,
        text: String,
        category: EditCategory,
        replacement_text: Option<String>,
        context: (String, String),
    ) -> Self {
        debug_assert_eq!(
            kind == EditKind::Replacement,
            replacement_text.is_some(),
            "Only replacements carry a replacement text"
        );

        let (context_before, context_after) = context;
        EditRecord {
            id,
            kind,
            text,
            category,
            replacement_text,
            context_before,
            context_after,
        }
    }

    /// Position of the record in the list it was built in.
    #[must_use]
    pub fn id(&self) -> usize { self.id }

    #[must_use]
    pub fn kind(&self) -> EditKind { self.kind }

    #[must_use]
    pub fn text(&self) -> &str { &self.text }

    #[must_use]
    pub fn category(&self) -> EditCategory { self.category }

    #[must_use]
    pub fn replacement_text(&self) -> Option<&str> { self.replacement_text.as_deref() }

    #[must_use]
    pub fn context_before(&self) -> &str { &self.context_before }

    #[must_use]
    pub fn context_after(&self) -> &str { &self.context_after }
}
