pub mod builder;
pub mod chunker;
pub mod context;
pub mod edit_record;

use builder::build_edit_records;
use chunker::chunk_operations;
use edit_record::EditRecord;

use crate::{
    config::EditConfig,
    diffs::{
        diff_error::DiffError,
        primitive::DiffPrimitive,
        word_diff::{semantic_word_diff, word_diff},
    },
};

/// Describes how `new` differs from `old` as a list of reviewable edits.
///
/// The texts are diffed word by word, alternating replacements are merged
/// into contiguous chunks, and each chunk becomes an `EditRecord` with a few
/// words of surrounding context.
///
/// ```
/// use redline::{EditKind, compute_edit_records};
///
/// let records = compute_edit_records("Stay tuned for more!", "Go live for more!");
/// let edit = records.iter().find(|record| record.kind() != EditKind::Unchanged).unwrap();
///
/// assert_eq!(edit.kind(), EditKind::Replacement);
/// assert_eq!(edit.text(), "Stay tuned");
/// assert_eq!(edit.replacement_text(), Some("Go live"));
/// ```
#[must_use]
pub fn compute_edit_records(old: &str, new: &str) -> Vec<EditRecord> {
    let operations = chunk_operations(semantic_word_diff(old, new));

    build_edit_records(&operations, &EditConfig::default())
}

/// Same as `compute_edit_records` with a custom diff primitive and
/// configuration. Failures of the primitive are passed on.
pub fn compute_edit_records_with<P>(
    primitive: &P,
    config: &EditConfig,
    old: &str,
    new: &str,
) -> Result<Vec<EditRecord>, DiffError>
where
    P: DiffPrimitive + ?Sized,
{
    let operations = chunk_operations(word_diff(primitive, old, new)?);

    Ok(build_edit_records(&operations, config))
}
