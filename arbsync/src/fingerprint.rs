//! Structural counters used to compare a source message with its
//! translation.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// Innermost `{...}` group: `{name}`, and the branch bodies of ICU
    /// plural/select messages.
    pub(crate) static ref PLACEHOLDER_REGEX: Regex = Regex::new(r"\{[^{}]*\}").unwrap();
    static ref HTML_ENTITY_REGEX: Regex =
        Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);").unwrap();
}

/// Bracket glyphs counted by [`TextFingerprint::parentheses_count`].
///
/// Curly braces are not listed: they delimit placeholders.
pub const BRACKETS: &[char] = &[
    '(', ')', '[', ']', // ASCII
    '（', '）', '［', '］', // fullwidth
    '【', '】', '〔', '〕', '〖', '〗', '〘', '〙', '〚', '〛', // CJK lenticular / tortoise shell
    '〈', '〉', '《', '》', // CJK angle
    '﹙', '﹚', '﹝', '﹞', // small form variants
    '⦅', '⦆', '｟', '｠', // white parentheses
];

/// Structural counters derived from a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextFingerprint {
    pub placeholder_count: usize,
    pub parentheses_count: usize,
    pub html_entity_count: usize,
    pub line_break_count: usize,
}

impl TextFingerprint {
    pub fn of(text: &str) -> Self {
        Self {
            placeholder_count: PLACEHOLDER_REGEX.find_iter(text).count(),
            parentheses_count: text.chars().filter(|c| BRACKETS.contains(c)).count(),
            html_entity_count: HTML_ENTITY_REGEX.find_iter(text).count(),
            line_break_count: text.matches('\n').count(),
        }
    }
}

/// Case-insensitive count of non-overlapping occurrences of `term`.
pub fn count_occurrences_ignore_case(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&term.to_lowercase()).count()
}
