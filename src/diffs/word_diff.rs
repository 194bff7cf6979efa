use std::convert::Infallible;

use crate::{
    diffs::{
        diff_error::DiffError,
        diff_op::DiffOp,
        primitive::{DiffPrimitive, SemanticDiff},
    },
    tokenizer::symbol_table::SymbolTable,
};

/// Diffs two texts at the granularity of words.
///
/// Both texts are encoded with one shared `SymbolTable` so that every word and
/// whitespace run becomes a single symbol, the symbol strings are diffed by
/// `primitive`, and the text of each resulting operation is decoded again.
pub fn word_diff<P>(primitive: &P, old: &str, new: &str) -> Result<Vec<DiffOp>, DiffError>
where
    P: DiffPrimitive + ?Sized,
{
    diff_encoded(old, new, |old_symbols, new_symbols| {
        primitive.diff(old_symbols, new_symbols)
    })
}

/// `word_diff` using `SemanticDiff`, which can't fail.
#[must_use]
pub fn semantic_word_diff(old: &str, new: &str) -> Vec<DiffOp> {
    let Ok(operations) = diff_encoded(old, new, |old_symbols, new_symbols| {
        Ok::<_, Infallible>(SemanticDiff::compute(old_symbols, new_symbols))
    });

    operations
}

fn diff_encoded<F, E>(old: &str, new: &str, diff: F) -> Result<Vec<DiffOp>, E>
where
    F: FnOnce(&str, &str) -> Result<Vec<DiffOp>, E>,
{
    let mut table = SymbolTable::new();
    let old_symbols = table.encode(old);
    let new_symbols = table.encode(new);

    let operations = diff(&old_symbols, &new_symbols)?;

    Ok(operations
        .into_iter()
        .map(|operation| operation.with_text(table.decode(operation.text())))
        .collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    use super::*;
    use crate::diffs::{
        diff_op::{new_text, old_text},
        primitive::SemanticDiff,
    };

    #[test_case("", ""; "both empty")]
    #[test_case("", "Launch day is here"; "from scratch")]
    #[test_case("Launch day is here", ""; "everything removed")]
    #[test_case("stay tuned for more", "go live for more"; "replaced words")]
    #[test_case("First line\n\nSecond line", "First line\nSecond paragraph"; "newlines")]
    #[test_case("  padded  text  ", "padded text"; "whitespace changes")]
    fn test_reconstructs_both_sides(old: &str, new: &str) {
        let operations = word_diff(&SemanticDiff, old, new).unwrap();

        assert_eq!(old_text(&operations), old);
        assert_eq!(new_text(&operations), new);
        assert_eq!(operations, semantic_word_diff(old, new));
    }

    #[test]
    fn test_single_word_replacement() {
        let operations =
            word_diff(&SemanticDiff, "The quick brown fox", "The slow brown fox").unwrap();

        assert_eq!(
            operations,
            vec![
                DiffOp::Equal("The ".into()),
                DiffOp::Delete("quick".into()),
                DiffOp::Insert("slow".into()),
                DiffOp::Equal(" brown fox".into()),
            ]
        );
    }

    #[test]
    fn test_words_are_not_split() {
        let operations = word_diff(&SemanticDiff, "better", "bitter").unwrap();

        assert_eq!(
            operations,
            vec![
                DiffOp::Delete("better".into()),
                DiffOp::Insert("bitter".into()),
            ]
        );
    }
}
