/// Splits text on word boundaries into alternating runs of whitespace and
/// non-whitespace characters. The runs cover the whole input without gaps,
/// so concatenating them gives back the original text.
///
/// ## Example
///
/// ```not_rust
/// "Hi  there!\n" -> ["Hi", "  ", "there!", "\n"]
/// ```
pub fn word_tokenizer(text: &str) -> Vec<&str> {
    let mut result = Vec::new();

    let mut previous_boundary_index = 0;
    let mut previous_char_is_whitespace = text.chars().next().is_none_or(char::is_whitespace);

    for (i, c) in text.char_indices() {
        let is_current_char_whitespace = c.is_whitespace();
        if previous_char_is_whitespace != is_current_char_whitespace {
            if i > previous_boundary_index {
                result.push(&text[previous_boundary_index..i]);
            }
            previous_boundary_index = i;
        }

        previous_char_is_whitespace = is_current_char_whitespace;
    }

    if previous_boundary_index < text.len() {
        result.push(&text[previous_boundary_index..]);
    }

    result
}
