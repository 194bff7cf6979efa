use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CONTEXT_WINDOW, DEFAULT_CONTEXT_WORDS, DEFAULT_ELLIPSIS};

/// Tunables for building edit records.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditConfig {
    /// Maximum number of words shown before and after an edit.
    #[cfg_attr(feature = "serde", serde(default = "default_context_words"))]
    pub context_words: usize,

    /// How many neighbouring operations are scanned for context words.
    #[cfg_attr(feature = "serde", serde(default = "default_context_window"))]
    pub context_window: usize,

    /// Marker put on the outer side of a context that was cut short.
    #[cfg_attr(feature = "serde", serde(default = "default_ellipsis"))]
    pub ellipsis: String,
}

fn default_context_words() -> usize {
    debug!("Using default context words: {DEFAULT_CONTEXT_WORDS}");
    DEFAULT_CONTEXT_WORDS
}

fn default_context_window() -> usize {
    debug!("Using default context window: {DEFAULT_CONTEXT_WINDOW}");
    DEFAULT_CONTEXT_WINDOW
}

fn default_ellipsis() -> String {
    debug!("Using default ellipsis: {DEFAULT_ELLIPSIS}");
    DEFAULT_ELLIPSIS.to_owned()
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            context_words: default_context_words(),
            context_window: default_context_window(),
            ellipsis: default_ellipsis(),
        }
    }
}

impl EditConfig {
    #[must_use]
    pub fn with_context_words(mut self, context_words: usize) -> Self {
        self.context_words = context_words;
        self
    }

    #[must_use]
    pub fn with_context_window(mut self, context_window: usize) -> Self {
        self.context_window = context_window;
        self
    }

    #[must_use]
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }
}
