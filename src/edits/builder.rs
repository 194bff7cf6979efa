use std::ops::Range;

use crate::{
    config::EditConfig,
    diffs::diff_op::DiffOp,
    edits::{
        context::{context_after, context_before},
        edit_record::{EditCategory, EditKind, EditRecord},
    },
};

/// An edit record before its id, category and context are known.
#[derive(Debug)]
struct Draft {
    kind: EditKind,
    text: String,
    replacement_text: Option<String>,
    /// The operations the record was made from.
    source: Range<usize>,
}

impl Draft {
    fn single(index: usize, operation: &DiffOp) -> Self {
        let kind = match operation {
            DiffOp::Equal(..) => EditKind::Unchanged,
            DiffOp::Insert(..) => EditKind::Insertion,
            DiffOp::Delete(..) => EditKind::Deletion,
        };

        Draft {
            kind,
            text: operation.text().to_owned(),
            replacement_text: None,
            source: index..index + 1,
        }
    }

    fn replacement(source: Range<usize>, deleted: String, inserted: &str) -> Self {
        Draft {
            kind: EditKind::Replacement,
            text: deleted,
            replacement_text: Some(inserted.to_owned()),
            source,
        }
    }

    fn into_record(
        self,
        id: usize,
        category: EditCategory,
        operations: &[DiffOp],
        config: &EditConfig,
    ) -> EditRecord {
        let context = if self.kind == EditKind::Unchanged {
            (String::new(), String::new())
        } else {
            (
                context_before(operations, self.source.start, config),
                context_after(operations, self.source.end, config),
            )
        };

        EditRecord::new(
            id,
            self.kind,
            self.text,
            category,
            self.replacement_text,
            context,
        )
    }
}

/// Turns a chunked diff into reviewable edit records.
///
/// Per position, in order:
/// 1. whitespace on a single line is formatting noise and gets skipped;
/// 2. a delete directly followed by an insert becomes a replacement;
/// 3. two edits of the same kind separated by whitespace on a single line
///    become one record, or one replacement when the edits are deletions
///    followed by an insert;
/// 4. anything else becomes a record of its own.
///
/// Rule 3 has no counterpart for insertions followed by a delete: those stay
/// a merged insertion and a separate deletion.
///
/// When the whole diff boils down to a single insertion, every record is
/// tagged `InitialContent`, otherwise `Clarity`.
pub fn build_edit_records(operations: &[DiffOp], config: &EditConfig) -> Vec<EditRecord> {
    let mut drafts = Vec::new();

    let mut cursor = 0;
    while cursor < operations.len() {
        let operation = &operations[cursor];

        if operation.is_inline_whitespace() {
            cursor += 1;
            continue;
        }

        if let (DiffOp::Delete(deleted), Some(DiffOp::Insert(inserted))) =
            (operation, operations.get(cursor + 1))
        {
            drafts.push(Draft::replacement(
                cursor..cursor + 2,
                deleted.clone(),
                inserted,
            ));
            cursor += 2;
            continue;
        }

        if let Some(draft) = merge_separated_edits(operations, cursor) {
            cursor = draft.source.end;
            drafts.push(draft);
            continue;
        }

        drafts.push(Draft::single(cursor, operation));
        cursor += 1;
    }

    let category = match drafts.as_slice() {
        [only] if only.kind == EditKind::Insertion => EditCategory::InitialContent,
        _ => EditCategory::Clarity,
    };

    drafts
        .into_iter()
        .enumerate()
        .map(|(id, draft)| draft.into_record(id, category, operations, config))
        .collect()
}

/// Matches `X(..) E(inline whitespace) X(..)` at `at` where `X` is an insert
/// or a delete. Deletions directly followed by an insert are turned into a
/// replacement instead.
fn merge_separated_edits(operations: &[DiffOp], at: usize) -> Option<Draft> {
    let [first, separator, second] = operations.get(at..at + 3)? else {
        return None;
    };

    if first.is_equal()
        || !first.is_same_kind(second)
        || !separator.is_equal()
        || !separator.is_inline_whitespace()
    {
        return None;
    }

    let merged = [first.text(), separator.text(), second.text()].concat();

    if let (DiffOp::Delete(..), Some(DiffOp::Insert(inserted))) = (first, operations.get(at + 3)) {
        return Some(Draft::replacement(at..at + 4, merged, inserted));
    }

    let mut draft = Draft::single(at, &first.with_text(merged));
    draft.source = at..at + 3;

    Some(draft)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn build(operations: &[DiffOp]) -> Vec<EditRecord> {
        build_edit_records(operations, &EditConfig::default())
    }

    #[test]
    fn test_replacement() {
        let records = build(&[DiffOp::Delete("foo".into()), DiffOp::Insert("bar".into())]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), EditKind::Replacement);
        assert_eq!(records[0].text(), "foo");
        assert_eq!(records[0].replacement_text(), Some("bar"));
        assert_eq!(records[0].category(), EditCategory::Clarity);
    }

    #[test]
    fn test_single_insertion_is_initial_content() {
        let records = build(&[DiffOp::Insert("Big news: we launched!".into())]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), EditKind::Insertion);
        assert_eq!(records[0].replacement_text(), None);
        assert_eq!(records[0].category(), EditCategory::InitialContent);
    }

    #[test]
    fn test_records_with_context() {
        let records = build(&[
            DiffOp::Equal("The quick brown ".into()),
            DiffOp::Delete("fox".into()),
            DiffOp::Insert("dog".into()),
            DiffOp::Equal(" jumps over".into()),
            DiffOp::Equal(" ".into()),
        ]);

        let expected = vec![
            EditRecord::new(
                0,
                EditKind::Unchanged,
                "The quick brown ".into(),
                EditCategory::Clarity,
                None,
                (String::new(), String::new()),
            ),
            EditRecord::new(
                1,
                EditKind::Replacement,
                "fox".into(),
                EditCategory::Clarity,
                Some("dog".into()),
                ("... quick brown".into(), "jumps over ...".into()),
            ),
            EditRecord::new(
                2,
                EditKind::Unchanged,
                " jumps over".into(),
                EditCategory::Clarity,
                None,
                (String::new(), String::new()),
            ),
        ];

        assert_eq!(records, expected);
    }

    #[test]
    fn test_skips_inline_whitespace_but_not_line_breaks() {
        let records = build(&[
            DiffOp::Insert("  ".into()),
            DiffOp::Equal("\n\n".into()),
            DiffOp::Delete("\t".into()),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), EditKind::Unchanged);
        assert_eq!(records[0].text(), "\n\n");
    }

    #[test]
    fn test_merges_separated_deletions() {
        let records = build(&[
            DiffOp::Equal("Ship it ".into()),
            DiffOp::Delete("right".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Delete("now".into()),
            DiffOp::Equal("!".into()),
        ]);

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].kind(), EditKind::Deletion);
        assert_eq!(records[1].text(), "right now");
        assert_eq!(records[1].context_before(), "... Ship it");
        assert_eq!(records[1].context_after(), "!");
        assert_eq!(records[2].text(), "!");
    }

    #[test]
    fn test_merges_separated_deletions_into_replacement() {
        let records = build(&[
            DiffOp::Delete("right".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Delete("now".into()),
            DiffOp::Insert("today".into()),
        ]);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind(), EditKind::Replacement);
        assert_eq!(records[0].text(), "right now");
        assert_eq!(records[0].replacement_text(), Some("today"));
    }

    #[test]
    fn test_separated_insertions_followed_by_deletion_stay_apart() {
        // Unlike deletions, insertions are never folded into a replacement
        // with a trailing delete.
        let records = build(&[
            DiffOp::Insert("brand".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Insert("new".into()),
            DiffOp::Delete("old".into()),
        ]);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind(), EditKind::Insertion);
        assert_eq!(records[0].text(), "brand new");
        assert_eq!(records[1].kind(), EditKind::Deletion);
        assert_eq!(records[1].text(), "old");
    }

    #[test]
    fn test_line_break_separator_is_not_merged() {
        let records = build(&[
            DiffOp::Insert("first".into()),
            DiffOp::Equal("\n".into()),
            DiffOp::Insert("second".into()),
        ]);

        assert_eq!(
            records.iter().map(EditRecord::kind).collect::<Vec<_>>(),
            vec![EditKind::Insertion, EditKind::Unchanged, EditKind::Insertion]
        );
    }

    #[test]
    fn test_ids_follow_order() {
        let records = build(&[
            DiffOp::Insert("a".into()),
            DiffOp::Equal(" b ".into()),
            DiffOp::Delete("c".into()),
        ]);

        assert_eq!(
            records.iter().map(EditRecord::id).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_empty() {
        assert_eq!(build(&[]), vec![]);
    }
}
