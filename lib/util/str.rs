/**
    Checks if the given character is a "word" separator in a file name.

    For internal use only.
*/
pub(crate) const fn char_is_word_separator(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '-' | '_' | '.' | '(' | ')' | '[' | ']')
}

/**
    Checks if the given haystack contains the given needle, ignoring case.

    An empty needle is always contained.
*/
pub(crate) fn contains_ignore_case(haystack: impl AsRef<str>, needle: impl AsRef<str>) -> bool {
    haystack
        .as_ref()
        .to_lowercase()
        .contains(&needle.as_ref().to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separators() {
        for c in [' ', '-', '_', '.'] {
            assert!(char_is_word_separator(c), "expected separator: {c:?}");
        }
        for c in ['a', 'Z', '0', '/'] {
            assert!(!char_is_word_separator(c), "unexpected separator: {c:?}");
        }
    }

    #[test]
    fn case_insensitive_contains() {
        assert!(contains_ignore_case("BREAKING: removed v1 API", "breaking"));
        assert!(contains_ignore_case("non-Breaking change", "BREAKING"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("break", "breaking"));
    }
}
