use crate::{config::EditConfig, diffs::diff_op::DiffOp};

/// Collects the words right before the operation at `start`.
///
/// Up to `context_window` preceding operations are scanned backwards. Only
/// unchanged text counts and only its last line is used, so the context never
/// reaches across a line break within one operation. A context holding the
/// full `context_words` gets the ellipsis in front of it.
pub fn context_before(operations: &[DiffOp], start: usize, config: &EditConfig) -> String {
    let window = &operations[start.saturating_sub(config.context_window)..start];

    let mut words = Vec::new();
    for operation in window.iter().rev() {
        if words.len() >= config.context_words {
            break;
        }

        let DiffOp::Equal(text) = operation else {
            continue;
        };

        let last_line = text.rsplit('\n').next().unwrap_or(text);
        let missing = config.context_words - words.len();
        words.extend(last_line.split_whitespace().rev().take(missing));
    }
    words.reverse();

    let context = words.join(" ");
    if is_full(&words, config) {
        format!("{} {context}", config.ellipsis)
    } else {
        context
    }
}

/// Mirror of `context_before` for the words following the operations up to
/// `end` (exclusive).
pub fn context_after(operations: &[DiffOp], end: usize, config: &EditConfig) -> String {
    let end = end.min(operations.len());
    let window = &operations[end..(end + config.context_window).min(operations.len())];

    let mut words = Vec::new();
    for operation in window {
        if words.len() >= config.context_words {
            break;
        }

        let DiffOp::Equal(text) = operation else {
            continue;
        };

        let first_line = text.split('\n').next().unwrap_or(text);
        let missing = config.context_words - words.len();
        words.extend(first_line.split_whitespace().take(missing));
    }

    let context = words.join(" ");
    if is_full(&words, config) {
        format!("{context} {}", config.ellipsis)
    } else {
        context
    }
}

fn is_full(words: &[&str], config: &EditConfig) -> bool {
    config.context_words > 0 && words.len() == config.context_words
}
