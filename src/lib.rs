//! Word-level edit records and streaming reconciliation of rewrites into an
//! editable document.
//!
//! `compute_edit_records` describes how a new version of a text differs from
//! the old one as reviewable insertions, deletions and replacements with a
//! few words of context. `Reconciler` merges a rewrite arriving in increments
//! into a selection of a document, showing it live until it's accepted or
//! rejected.

mod config;
mod consts;
mod diffs;
mod edits;
mod reconciliation;
mod tokenizer;

pub use config::EditConfig;
pub use diffs::{
    diff_error::DiffError,
    diff_op::{DiffOp, new_text, old_text},
    primitive::{DiffPrimitive, SemanticDiff},
    word_diff::{semantic_word_diff, word_diff},
};
pub use edits::{
    builder::build_edit_records,
    chunker::chunk_operations,
    compute_edit_records, compute_edit_records_with,
    edit_record::{EditCategory, EditKind, EditRecord},
};
pub use reconciliation::{
    document::{Document, NodeId, NodeKind},
    document_error::DocumentError,
    reconcile_error::ReconcileError,
    reconciler::{Reconciler, SessionHandle},
    registry::{CancellationToken, StreamId, StreamRegistry},
    session::{ReconciliationSession, SessionId, SessionState},
};
pub use tokenizer::{
    symbol_table::{SymbolTable, encode},
    word_tokenizer::word_tokenizer,
};

#[cfg(feature = "wasm")]
pub mod wasm;
