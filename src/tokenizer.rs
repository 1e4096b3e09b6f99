/// Splits a sentence into lower-cased words, dropping one trailing period.
///
/// "Fall leaves fall." -> ["fall", "leaves", "fall"]
pub fn tokenize(text: &str) -> Vec<String> {
    let text = text.strip_suffix('.').unwrap_or(text);

    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
