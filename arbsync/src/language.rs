//! Static catalog of languages arbsync can synchronize.
//!
//! Codes follow the ARB/Flutter convention (`pt_BR`, `zh_TW`); each entry also
//! records the code the translation service expects (`pt`, `zh-TW`) and the
//! script direction. Lookups normalize case and `-`/`_` separators but never
//! fall back to a base language: an unknown code is an error.

use std::{collections::HashMap, fmt::Display};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextDirection {
    Ltr,
    Rtl,
}

/// A language from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    /// ARB locale code, also used in file names and `@@locale`.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
    /// Code understood by the translation service.
    pub translator_code: &'static str,
    pub direction: TextDirection,
}

impl Language {
    /// Looks up a language by ARB code (`fr`, `pt_BR`, `zh-tw`, ...).
    pub fn from_code(code: &str) -> Result<&'static Language, Error> {
        CATALOG_INDEX
            .get(&normalize_code(code))
            .copied()
            .ok_or_else(|| Error::UnknownLanguage(code.to_string()))
    }

    /// Every language in the catalog, in catalog order.
    pub fn all() -> &'static [Language] {
        &CATALOG
    }

    pub fn is_rtl(&self) -> bool {
        self.direction == TextDirection::Rtl
    }
}

impl Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

/// Serializes a language reference as its ARB code.
pub fn serialize_code<S: serde::Serializer>(
    language: &&'static Language,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(language.code)
}

fn normalize_code(code: &str) -> String {
    code.trim().replace('-', "_").to_ascii_lowercase()
}

const fn ltr(
    code: &'static str,
    name: &'static str,
    translator_code: &'static str,
) -> Language {
    Language {
        code,
        name,
        translator_code,
        direction: TextDirection::Ltr,
    }
}

const fn rtl(
    code: &'static str,
    name: &'static str,
    translator_code: &'static str,
) -> Language {
    Language {
        code,
        name,
        translator_code,
        direction: TextDirection::Rtl,
    }
}

static CATALOG: [Language; 112] = [
    ltr("af", "Afrikaans", "af"),
    ltr("sq", "Albanian", "sq"),
    ltr("am", "Amharic", "am"),
    rtl("ar", "Arabic", "ar"),
    ltr("hy", "Armenian", "hy"),
    ltr("as", "Assamese", "as"),
    ltr("ay", "Aymara", "ay"),
    ltr("az", "Azerbaijani", "az"),
    ltr("bm", "Bambara", "bm"),
    ltr("eu", "Basque", "eu"),
    ltr("be", "Belarusian", "be"),
    ltr("bn", "Bengali", "bn"),
    ltr("bho", "Bhojpuri", "bho"),
    ltr("bs", "Bosnian", "bs"),
    ltr("bg", "Bulgarian", "bg"),
    ltr("ca", "Catalan", "ca"),
    ltr("ceb", "Cebuano", "ceb"),
    ltr("zh_CN", "Chinese (Simplified)", "zh-CN"),
    ltr("zh_TW", "Chinese (Traditional)", "zh-TW"),
    ltr("co", "Corsican", "co"),
    ltr("hr", "Croatian", "hr"),
    ltr("cs", "Czech", "cs"),
    ltr("da", "Danish", "da"),
    rtl("dv", "Dhivehi", "dv"),
    ltr("doi", "Dogri", "doi"),
    ltr("nl", "Dutch", "nl"),
    ltr("en", "English", "en"),
    ltr("eo", "Esperanto", "eo"),
    ltr("et", "Estonian", "et"),
    ltr("ee", "Ewe", "ee"),
    ltr("fil", "Filipino", "tl"),
    ltr("fi", "Finnish", "fi"),
    ltr("fr", "French", "fr"),
    ltr("fy", "Frisian", "fy"),
    ltr("gl", "Galician", "gl"),
    ltr("ka", "Georgian", "ka"),
    ltr("de", "German", "de"),
    ltr("el", "Greek", "el"),
    ltr("gn", "Guarani", "gn"),
    ltr("gu", "Gujarati", "gu"),
    ltr("ht", "Haitian Creole", "ht"),
    ltr("ha", "Hausa", "ha"),
    ltr("haw", "Hawaiian", "haw"),
    rtl("he", "Hebrew", "iw"),
    ltr("hi", "Hindi", "hi"),
    ltr("hmn", "Hmong", "hmn"),
    ltr("hu", "Hungarian", "hu"),
    ltr("is", "Icelandic", "is"),
    ltr("ig", "Igbo", "ig"),
    ltr("ilo", "Ilocano", "ilo"),
    ltr("id", "Indonesian", "id"),
    ltr("ga", "Irish", "ga"),
    ltr("it", "Italian", "it"),
    ltr("ja", "Japanese", "ja"),
    ltr("jv", "Javanese", "jw"),
    ltr("kn", "Kannada", "kn"),
    ltr("kk", "Kazakh", "kk"),
    ltr("km", "Khmer", "km"),
    ltr("rw", "Kinyarwanda", "rw"),
    ltr("gom", "Konkani", "gom"),
    ltr("ko", "Korean", "ko"),
    ltr("kri", "Krio", "kri"),
    ltr("ku", "Kurdish (Kurmanji)", "ku"),
    rtl("ckb", "Kurdish (Sorani)", "ckb"),
    ltr("ky", "Kyrgyz", "ky"),
    ltr("lo", "Lao", "lo"),
    ltr("la", "Latin", "la"),
    ltr("lv", "Latvian", "lv"),
    ltr("ln", "Lingala", "ln"),
    ltr("lt", "Lithuanian", "lt"),
    ltr("lg", "Luganda", "lg"),
    ltr("lb", "Luxembourgish", "lb"),
    ltr("mk", "Macedonian", "mk"),
    ltr("mai", "Maithili", "mai"),
    ltr("mg", "Malagasy", "mg"),
    ltr("ms", "Malay", "ms"),
    ltr("ml", "Malayalam", "ml"),
    ltr("mt", "Maltese", "mt"),
    ltr("mi", "Maori", "mi"),
    ltr("mr", "Marathi", "mr"),
    ltr("lus", "Mizo", "lus"),
    ltr("mn", "Mongolian", "mn"),
    ltr("my", "Myanmar (Burmese)", "my"),
    ltr("ne", "Nepali", "ne"),
    ltr("nb", "Norwegian", "no"),
    ltr("ny", "Nyanja (Chichewa)", "ny"),
    ltr("or", "Odia (Oriya)", "or"),
    ltr("om", "Oromo", "om"),
    rtl("ps", "Pashto", "ps"),
    rtl("fa", "Persian", "fa"),
    ltr("pl", "Polish", "pl"),
    ltr("pt", "Portuguese", "pt"),
    ltr("pt_BR", "Portuguese (Brazil)", "pt"),
    ltr("pa", "Punjabi", "pa"),
    ltr("ro", "Romanian", "ro"),
    ltr("ru", "Russian", "ru"),
    ltr("sm", "Samoan", "sm"),
    ltr("sr", "Serbian", "sr"),
    ltr("si", "Sinhala", "si"),
    ltr("sk", "Slovak", "sk"),
    ltr("sl", "Slovenian", "sl"),
    ltr("es", "Spanish", "es"),
    ltr("sw", "Swahili", "sw"),
    ltr("sv", "Swedish", "sv"),
    ltr("ta", "Tamil", "ta"),
    ltr("th", "Thai", "th"),
    ltr("tr", "Turkish", "tr"),
    ltr("uk", "Ukrainian", "uk"),
    rtl("ur", "Urdu", "ur"),
    rtl("ug", "Uyghur", "ug"),
    ltr("vi", "Vietnamese", "vi"),
    rtl("yi", "Yiddish", "yi"),
];

lazy_static! {
    static ref CATALOG_INDEX: HashMap<String, &'static Language> = CATALOG
        .iter()
        .map(|language| (normalize_code(language.code), language))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_large_and_unique() {
        assert!(Language::all().len() >= 100);
        assert_eq!(CATALOG_INDEX.len(), Language::all().len());
    }

    #[test]
    fn test_lookup_normalizes_separators_and_case() {
        let zh = Language::from_code("zh-tw").unwrap();
        assert_eq!(zh.code, "zh_TW");
        assert_eq!(zh.translator_code, "zh-TW");
        assert_eq!(Language::from_code(" FR ").unwrap().code, "fr");
    }

    #[test]
    fn test_unknown_language_is_an_error() {
        let err = Language::from_code("xx").unwrap_err();
        assert!(matches!(err, Error::UnknownLanguage(code) if code == "xx"));
    }

    #[test]
    fn test_no_fallback_to_base_language() {
        assert!(Language::from_code("fr_CA").is_err());
    }

    #[test]
    fn test_direction() {
        assert!(Language::from_code("ar").unwrap().is_rtl());
        assert!(!Language::from_code("en").unwrap().is_rtl());
    }

    #[test]
    fn test_display() {
        let he = Language::from_code("he").unwrap();
        assert_eq!(he.to_string(), "Hebrew (he)");
    }
}
