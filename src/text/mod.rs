//! Text normalization
//!
//! Canonicalizes lyric lines for comparison and cache keying. The same
//! normalization is used by the aligner (candidate matching) and the cache
//! subsystem (key derivation), so the two can never disagree about what
//! counts as "the same line".

/// Normalize a line of text for comparison.
///
/// Lowercases, drops every character outside the word/space classes
/// (Unicode alphanumerics and `_` count as word characters), collapses
/// whitespace runs to a single space, and trims. Pure and total; applying
/// it twice yields the same result as applying it once.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let filtered: String = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse internal whitespace runs to single spaces and trim.
///
/// Unlike [`normalize`] this keeps case and punctuation; it is used on
/// reconstructed block text, which must stay presentable.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_case() {
        assert_eq!(normalize("Hello, World!"), "hello world");
    }

    #[test]
    fn drops_punctuation_without_splitting_words() {
        // Apostrophes vanish the way the comparison expects
        assert_eq!(normalize("don't stop"), "dont stop");
    }

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize("  a \t b\n c  "), "a b c");
    }
}
