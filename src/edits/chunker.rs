use crate::diffs::diff_op::DiffOp;

/// Merges alternating replacements into one contiguous replacement.
///
/// A diff of `"stay tuned"` against `"go live"` often comes out as
/// `D(stay) I(go) E( ) D(tuned) I(live)`. Whenever a delete is directly
/// followed by an insert, the following `whitespace, delete, insert` triples
/// are absorbed for as long as the pattern repeats, giving
/// `D(stay tuned) I(go live)`. The whitespace lands on both sides, so the
/// result still reconstructs the old and the new text.
///
/// Whitespace containing a line break is never absorbed: it separates lines
/// or paragraphs and has to stay visible as such. Everything that doesn't
/// match is copied through unchanged.
pub fn chunk_operations<I>(operations: I) -> Vec<DiffOp>
where
    I: IntoIterator<Item = DiffOp>,
{
    let operations: Vec<DiffOp> = operations.into_iter().collect();
    let mut result = Vec::with_capacity(operations.len());

    let mut cursor = 0;
    while cursor < operations.len() {
        let (DiffOp::Delete(deleted), Some(DiffOp::Insert(inserted))) =
            (&operations[cursor], operations.get(cursor + 1))
        else {
            result.push(operations[cursor].clone());
            cursor += 1;
            continue;
        };

        let mut deleted = deleted.clone();
        let mut inserted = inserted.clone();
        cursor += 2;

        while let Some((gap, next_deleted, next_inserted)) = replacement_triple(&operations, cursor)
        {
            deleted.push_str(gap);
            deleted.push_str(next_deleted);
            inserted.push_str(gap);
            inserted.push_str(next_inserted);
            cursor += 3;
        }

        result.push(DiffOp::Delete(deleted));
        result.push(DiffOp::Insert(inserted));
    }

    result
}

/// Matches `E(inline whitespace) D(..) I(..)` starting at `at`.
fn replacement_triple(operations: &[DiffOp], at: usize) -> Option<(&str, &str, &str)> {
    match operations.get(at..at + 3)? {
        [
            separator @ DiffOp::Equal(gap),
            DiffOp::Delete(deleted),
            DiffOp::Insert(inserted),
        ] if separator.is_inline_whitespace() => Some((gap, deleted, inserted)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::diffs::{
        diff_op::{new_text, old_text},
        word_diff::semantic_word_diff,
    };

    #[test]
    fn test_merges_alternating_replacements() {
        let operations = vec![
            DiffOp::Equal("Please ".into()),
            DiffOp::Delete("stay".into()),
            DiffOp::Insert("go".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Delete("tuned".into()),
            DiffOp::Insert("live".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Delete("now".into()),
            DiffOp::Insert("today".into()),
            DiffOp::Equal("!".into()),
        ];

        assert_eq!(
            chunk_operations(operations),
            vec![
                DiffOp::Equal("Please ".into()),
                DiffOp::Delete("stay tuned now".into()),
                DiffOp::Insert("go live today".into()),
                DiffOp::Equal("!".into()),
            ]
        );
    }

    #[test]
    fn test_keeps_line_breaks() {
        let operations = vec![
            DiffOp::Delete("stay".into()),
            DiffOp::Insert("go".into()),
            DiffOp::Equal(" \n".into()),
            DiffOp::Delete("tuned".into()),
            DiffOp::Insert("live".into()),
        ];

        assert_eq!(chunk_operations(operations.clone()), operations);
    }

    #[test]
    fn test_stops_when_pattern_breaks() {
        let operations = vec![
            DiffOp::Delete("stay".into()),
            DiffOp::Insert("go".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Delete("tuned".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Insert("live".into()),
        ];

        assert_eq!(chunk_operations(operations.clone()), operations);
    }

    #[test]
    fn test_insert_before_delete_is_copied() {
        let operations = vec![
            DiffOp::Insert("go".into()),
            DiffOp::Delete("stay".into()),
            DiffOp::Equal(" ".into()),
            DiffOp::Insert("live".into()),
            DiffOp::Delete("tuned".into()),
        ];

        assert_eq!(chunk_operations(operations.clone()), operations);
    }

    #[test]
    fn test_empty() {
        assert_eq!(chunk_operations(Vec::new()), vec![]);
    }

    #[test_case("stay tuned for more", "go live for more")]
    #[test_case("one two three four five", "uno dos tres cuatro cinco")]
    #[test_case("Line one\nline two", "Row one\nrow two")]
    #[test_case("", "brand new post")]
    fn test_keeps_reconstruction(old: &str, new: &str) {
        let operations = chunk_operations(semantic_word_diff(old, new));

        assert_eq!(old_text(&operations), old);
        assert_eq!(new_text(&operations), new);
    }
}
