//! The history snapshot: the source file's translatable values as of the
//! last successful synchronization.
//!
//! A key whose source value still matches its history value (and that exists
//! in a target file) does not need retranslation for that target.

use std::{
    collections::BTreeMap,
    io::{BufRead, Write},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{error::Error, traits::Parser, types::ArbDocument};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: BTreeMap<String, String>,
}

impl Parser for History {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the snapshot at `path`; a missing file is an empty history.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        match Self::read_from(path) {
            Ok(history) => Ok(history),
            Err(Error::FileNotFound { .. }) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// `true` when `key` was last synchronized with exactly `value`.
    pub fn is_unchanged(&self, key: &str, value: &str) -> bool {
        self.get(key) == Some(value)
    }

    /// Translatable source keys whose value differs from, or is missing in,
    /// the snapshot. Keys come back in source order.
    pub fn compare(&self, source: &ArbDocument) -> Vec<String> {
        source
            .translatable()
            .filter(|(key, value)| !self.is_unchanged(key, value))
            .map(|(key, _)| key.to_string())
            .collect()
    }

    /// Records the current source value of each listed key without
    /// translating it, so the change is not picked up for retranslation.
    /// Keys that are not translatable source keys are ignored; the number of
    /// recorded keys is returned.
    pub fn mark_excluded<S: AsRef<str>>(&mut self, source: &ArbDocument, keys: &[S]) -> usize {
        let mut marked = 0;
        for key in keys {
            let key = key.as_ref();
            if let Some(value) = source
                .translatable()
                .find_map(|(k, v)| (k == key).then_some(v))
            {
                self.insert(key, value);
                marked += 1;
            }
        }
        marked
    }

    /// Overwrites the snapshot with the source's translatable map.
    pub fn replace_with(&mut self, source: &ArbDocument) {
        self.entries = source.translatable_map();
    }

    /// Renames `old` to `new`, keeping its value.
    pub fn rename_key(&mut self, old: &str, new: &str) -> bool {
        match self.entries.remove(old) {
            Some(value) => {
                self.entries.insert(new.to_string(), value);
                true
            }
            None => false,
        }
    }
}
