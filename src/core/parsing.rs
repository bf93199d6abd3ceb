//! Shared text-extraction primitives used across the rating pipeline.
//!
//! Ported from `common/utils.py`'s `strip_string`, `extract_first_square_brackets`,
//! and `extract_first_code_block`.

use regex::Regex;
use std::sync::LazyLock;

static SQUARE_BRACKETS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*?\]").unwrap_or_else(|e| unreachable!("{e}")));

static CODE_BLOCK_WITH_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:\w+\n)?(.*?)```").unwrap_or_else(|e| unreachable!("{e}")));

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap_or_else(|e| unreachable!("{e}")));

/// Strips a string of leading/trailing newlines and spaces only (matches
/// Python's `s.strip(' \n')`, which is narrower than `str::trim`).
#[must_use]
pub fn strip_string(s: &str) -> &str {
    s.trim_matches(|c| c == ' ' || c == '\n')
}

/// Extracts the contents of the first `[...]` span in `input`, without the
/// brackets. Returns an empty string if none is found.
#[must_use]
pub fn extract_first_square_brackets(input: &str) -> String {
    SQUARE_BRACKETS
        .find(input)
        .map(|m| {
            let matched = m.as_str();
            matched[1..matched.len() - 1].to_string()
        })
        .unwrap_or_default()
}

/// Extracts the contents of the first fenced code block (` ``` `), ignoring
/// any language tag on the opening fence. Returns an empty string if none is
/// found. The extracted contents are run through [`strip_string`].
#[must_use]
pub fn extract_first_code_block(input: &str) -> String {
    CODE_BLOCK_WITH_LANG
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| strip_string(m.as_str()).to_string())
        .unwrap_or_default()
}

/// Strips non-alphanumeric/non-whitespace characters, then trims whitespace.
/// Matches `rate_atomic_fact.py`'s `re.sub(r'[^\w\s]', '', answer).strip()`
/// used before checking the verdict label.
#[must_use]
pub fn strip_non_alphanumeric(input: &str) -> String {
    NON_ALPHANUMERIC.replace_all(input, "").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_string_removes_newlines_and_spaces_only() {
        assert_eq!(strip_string("  \n hello \n  "), "hello");
        assert_eq!(strip_string("\thello\t"), "\thello\t");
    }

    #[test]
    fn test_extract_first_square_brackets_basic() {
        assert_eq!(extract_first_square_brackets("prefix [Foo] suffix"), "Foo");
    }

    #[test]
    fn test_extract_first_square_brackets_takes_first() {
        assert_eq!(
            extract_first_square_brackets("[First] then [Second]"),
            "First"
        );
    }

    #[test]
    fn test_extract_first_square_brackets_none_found() {
        assert_eq!(extract_first_square_brackets("no brackets here"), "");
    }

    #[test]
    fn test_extract_first_square_brackets_multiline() {
        assert_eq!(
            extract_first_square_brackets("reasoning...\n[Supported]\nmore text"),
            "Supported"
        );
    }

    #[test]
    fn test_extract_first_code_block_plain() {
        assert_eq!(
            extract_first_code_block("some text\n```\nmy query\n```\nmore"),
            "my query"
        );
    }

    #[test]
    fn test_extract_first_code_block_with_language_tag() {
        assert_eq!(
            extract_first_code_block("```text\nQuoc Le teaches deep learning.\n```"),
            "Quoc Le teaches deep learning."
        );
    }

    #[test]
    fn test_extract_first_code_block_none_found() {
        assert_eq!(extract_first_code_block("no code block here"), "");
    }

    #[test]
    fn test_strip_non_alphanumeric_label() {
        assert_eq!(strip_non_alphanumeric(" supported "), "supported");
        assert_eq!(strip_non_alphanumeric("Not Supported!!"), "Not Supported");
    }
}
