//! The ARB document model.
//!
//! An ARB file is a flat JSON object. Keys starting with `@` are reserved:
//! `@@locale` names the file's language, `@name` carries ICU metadata for the
//! sibling key `name`, and other `@@` keys are global attributes. Everything
//! else is a translatable message whose value must be a string.

use std::{
    collections::BTreeMap,
    fmt::Display,
    io::{BufRead, Write},
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::{error::Error, language::Language, traits::Parser};

/// Reserved key holding the document's language code.
pub const LOCALE_KEY: &str = "@@locale";

/// Raw, ordered key→value map of an ARB file.
pub type Entries = Map<String, Value>;

impl Parser for Entries {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let value: Value = serde_json::from_reader(reader)?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(Error::InvalidDocument(format!(
                "expected a JSON object at the top level, found {}",
                json_kind(&other)
            ))),
        }
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Role of a key inside an ARB document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// `@@locale`.
    Locale,
    /// `@name` metadata or another `@@` global attribute.
    Metadata,
    /// A message that gets translated.
    Translatable,
}

impl KeyKind {
    pub fn of(key: &str) -> Self {
        if key == LOCALE_KEY {
            KeyKind::Locale
        } else if key.starts_with('@') {
            KeyKind::Metadata
        } else {
            KeyKind::Translatable
        }
    }
}

/// Returns `true` for keys that are translated, diffed and validated.
pub fn is_translatable_key(key: &str) -> bool {
    KeyKind::of(key) == KeyKind::Translatable
}

/// Metadata key attached to the translatable key `key`.
pub fn metadata_key_for(key: &str) -> String {
    format!("@{}", key)
}

/// One language's ARB file.
#[derive(Debug, Clone, PartialEq)]
pub struct ArbDocument {
    pub path: PathBuf,
    pub language: &'static Language,
    entries: Entries,
}

impl ArbDocument {
    /// Builds a document, checking that every translatable value is a string.
    pub fn from_entries(
        path: impl Into<PathBuf>,
        language: &'static Language,
        entries: Entries,
    ) -> Result<Self, Error> {
        if let Some((key, value)) = entries
            .iter()
            .find(|(key, value)| is_translatable_key(key) && !value.is_string())
        {
            return Err(Error::InvalidDocument(format!(
                "value of `{}` must be a string, found {}",
                key,
                json_kind(value)
            )));
        }
        Ok(Self {
            path: path.into(),
            language,
            entries,
        })
    }

    /// A fresh document holding only `{"@@locale": <code>}`.
    pub fn seed(path: impl Into<PathBuf>, language: &'static Language) -> Self {
        let mut entries = Entries::new();
        entries.insert(
            LOCALE_KEY.to_string(),
            Value::String(language.code.to_string()),
        );
        Self {
            path: path.into(),
            language,
            entries,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &Entries {
        &self.entries
    }

    pub fn into_entries(self) -> Entries {
        self.entries
    }

    /// All keys, in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All values, in document order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// String value of `key`, if present and a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(Value::as_str)
    }

    /// Translatable `(key, value)` pairs in document order.
    pub fn translatable(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().filter_map(|(key, value)| {
            if is_translatable_key(key) {
                value.as_str().map(|text| (key.as_str(), text))
            } else {
                None
            }
        })
    }

    /// Translatable entries as a sorted map (the shape stored in history).
    pub fn translatable_map(&self) -> BTreeMap<String, String> {
        self.translatable()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    pub fn translatable_count(&self) -> usize {
        self.translatable().count()
    }

    /// Value of `@@locale`, if any.
    pub fn locale(&self) -> Option<&str> {
        self.get_str(LOCALE_KEY)
    }

    /// Rewrites `@@locale` to this document's language code. Returns `true`
    /// when the stored value changed.
    pub fn sync_locale(&mut self) -> bool {
        if self.locale() == Some(self.language.code) {
            return false;
        }
        self.entries.insert(
            LOCALE_KEY.to_string(),
            Value::String(self.language.code.to_string()),
        );
        true
    }

    /// Inserts or replaces a string value. Existing keys keep their position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), Value::String(value.into()));
    }

    /// Inserts or replaces a raw JSON value (used for metadata).
    pub fn insert_value(&mut self, key: impl Into<String>, value: Value) {
        self.entries.insert(key.into(), value);
    }

    /// Removes `key` keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Renames `old` to `new` in place, keeping its position. Returns `false`
    /// when `old` is absent.
    pub fn rename_key(&mut self, old: &str, new: &str) -> bool {
        if !self.entries.contains_key(old) || old == new {
            return false;
        }
        let entries = std::mem::take(&mut self.entries);
        self.entries = entries
            .into_iter()
            .filter(|(key, _)| key != new)
            .map(|(key, value)| {
                if key == old {
                    (new.to_string(), value)
                } else {
                    (key, value)
                }
            })
            .collect();
        true
    }

    /// Replaces all entries at once.
    pub fn replace_entries(&mut self, entries: Entries) {
        self.entries = entries;
    }
}

impl Display for ArbDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ArbDocument {{ path: {}, language: {}, keys: {} }}",
            self.path.display(),
            self.language.code,
            self.entries.len()
        )
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
