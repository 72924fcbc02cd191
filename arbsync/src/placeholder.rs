//! Shielding `{placeholder}` tokens from machine translation.
//!
//! Before a message goes to the translator every `{...}` group is swapped for
//! a sentinel glyph that translators pass through untouched; afterwards the
//! sentinels are swapped back, HTML entities the translator may have emitted
//! are decoded and the punctuation pass runs.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{error::Error, fingerprint::PLACEHOLDER_REGEX};

/// Sentinels handed out in order, one per placeholder occurrence.
pub const SENTINEL_POOL: [&str; 10] = [
    "🍎", "🍊", "🍋", "🍉", "🍇", "🍓", "🍒", "🍑", "🍍", "🥝",
];

/// Fullwidth punctuation and its ASCII replacement.
const FULLWIDTH_PUNCTUATION: &[(char, char)] = &[
    ('，', ','),
    ('。', '.'),
    ('：', ':'),
    ('；', ';'),
    ('！', '!'),
    ('？', '?'),
    ('（', '('),
    ('）', ')'),
];

/// What the decoder does with fullwidth punctuation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunctuationMode {
    /// Leave punctuation exactly as the translator returned it. Matches the
    /// output already stored in existing caches and history files.
    #[default]
    Preserve,
    /// Replace fullwidth punctuation with its ASCII equivalent.
    Normalize,
}

/// A message with its placeholders swapped for sentinels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedText {
    /// Text to send to the translator.
    pub text: String,
    /// Sentinel → original placeholder, in order of appearance.
    pub placeholders: Vec<(&'static str, String)>,
}

impl EncodedText {
    /// Swaps every sentinel in `translated` back for its placeholder.
    pub fn restore(&self, translated: &str) -> String {
        self.placeholders
            .iter()
            .fold(translated.to_string(), |text, (sentinel, original)| {
                text.replace(sentinel, original)
            })
    }

    /// Full decoding pipeline: restore placeholders, decode HTML entities,
    /// then apply the punctuation pass.
    pub fn decode(&self, translated: &str, punctuation: PunctuationMode) -> String {
        let restored = self.restore(translated);
        let decoded = html_escape::decode_html_entities(&restored);
        normalize_punctuation(&decoded, punctuation).into_owned()
    }
}

/// Replaces each `{...}` group, left to right, with the next free sentinel.
///
/// Sentinels that already occur in `text` are never handed out. Running out
/// of sentinels is an error rather than a partial encoding.
pub fn encode(text: &str) -> Result<EncodedText, Error> {
    let groups: Vec<_> = PLACEHOLDER_REGEX.find_iter(text).collect();
    if groups.is_empty() {
        return Ok(EncodedText {
            text: text.to_string(),
            placeholders: Vec::new(),
        });
    }

    let available: Vec<&'static str> = SENTINEL_POOL
        .iter()
        .copied()
        .filter(|sentinel| !text.contains(*sentinel))
        .collect();
    if groups.len() > available.len() {
        return Err(Error::PlaceholderPoolExhausted {
            found: groups.len(),
            capacity: available.len(),
        });
    }

    let mut encoded = String::with_capacity(text.len());
    let mut placeholders = Vec::with_capacity(groups.len());
    let mut last = 0;
    for (group, sentinel) in groups.iter().zip(available) {
        encoded.push_str(&text[last..group.start()]);
        encoded.push_str(sentinel);
        placeholders.push((sentinel, group.as_str().to_string()));
        last = group.end();
    }
    encoded.push_str(&text[last..]);

    Ok(EncodedText {
        text: encoded,
        placeholders,
    })
}

/// Applies the punctuation pass selected by `mode`.
pub fn normalize_punctuation(text: &str, mode: PunctuationMode) -> Cow<'_, str> {
    match mode {
        PunctuationMode::Preserve => Cow::Borrowed(text),
        PunctuationMode::Normalize => {
            if !text
                .chars()
                .any(|c| FULLWIDTH_PUNCTUATION.iter().any(|(from, _)| *from == c))
            {
                return Cow::Borrowed(text);
            }
            Cow::Owned(
                text.chars()
                    .map(|c| {
                        FULLWIDTH_PUNCTUATION
                            .iter()
                            .find(|(from, _)| *from == c)
                            .map_or(c, |(_, to)| *to)
                    })
                    .collect(),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_replaces_in_order() {
        let encoded = encode("Hello {name}, you have {count} messages").unwrap();
        assert_eq!(encoded.text, "Hello 🍎, you have 🍊 messages");
        assert_eq!(
            encoded.placeholders,
            vec![("🍎", "{name}".to_string()), ("🍊", "{count}".to_string())]
        );
    }

    #[test]
    fn test_encode_without_placeholders_is_identity() {
        let encoded = encode("Plain text").unwrap();
        assert_eq!(encoded.text, "Plain text");
        assert!(encoded.placeholders.is_empty());
    }

    #[test]
    fn test_restore_is_order_independent() {
        let encoded = encode("{first} then {second}").unwrap();
        // A translator may reorder the tokens.
        let restored = encoded.restore("🍊 puis 🍎");
        assert_eq!(restored, "{second} puis {first}");
    }

    #[test]
    fn test_pool_exhaustion() {
        let text: String = (0..11).map(|i| format!("{{p{}}} ", i)).collect();
        let err = encode(&text).unwrap_err();
        assert!(matches!(
            err,
            Error::PlaceholderPoolExhausted {
                found: 11,
                capacity: 10
            }
        ));
    }

    #[test]
    fn test_ten_placeholders_fit() {
        let text: String = (0..10).map(|i| format!("{{p{}}}", i)).collect();
        let encoded = encode(&text).unwrap();
        assert_eq!(encoded.decode(&encoded.text, PunctuationMode::Preserve), text);
    }

    #[test]
    fn test_sentinels_present_in_text_are_skipped() {
        let encoded = encode("🍎 for {name}").unwrap();
        assert_eq!(encoded.text, "🍎 for 🍊");
        assert_eq!(encoded.restore(&encoded.text), "🍎 for {name}");
    }

    #[test]
    fn test_sentinel_in_text_shrinks_pool() {
        let text: String = std::iter::once("🍎 ".to_string())
            .chain((0..10).map(|i| format!("{{p{}}} ", i)))
            .collect();
        let err = encode(&text).unwrap_err();
        assert!(matches!(
            err,
            Error::PlaceholderPoolExhausted {
                found: 10,
                capacity: 9
            }
        ));
    }

    #[test]
    fn test_decode_unescapes_html() {
        let encoded = encode("Tom & {name}").unwrap();
        let decoded = encoded.decode("Tom &amp; 🍎", PunctuationMode::Preserve);
        assert_eq!(decoded, "Tom & {name}");
    }

    #[test]
    fn test_punctuation_modes() {
        let text = "你好，{name}！";
        assert_eq!(normalize_punctuation(text, PunctuationMode::Preserve), text);
        assert_eq!(
            normalize_punctuation(text, PunctuationMode::Normalize),
            "你好,{name}!"
        );
    }
}
