//! Placeholder-safe, content-addressed translation cache.
//!
//! Entries are keyed by the exact source text plus the language pair and are
//! never rewritten once stored. A persistent cache is written through to disk
//! by [`TranslationCache::insert`] and [`TranslationCache::translate`], and
//! once per batch by [`TranslationCache::translate_batch`].

use std::{
    collections::{BTreeMap, HashMap, HashSet},
    io::{BufRead, Write},
    path::{Path, PathBuf},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicUsize, Ordering},
    },
};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::Error,
    language::Language,
    placeholder::{self, PunctuationMode},
    traits::Parser,
    translator::Translator,
};

/// Identity of a cached translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationCacheKey {
    pub text: String,
    pub source: String,
    pub target: String,
}

impl TranslationCacheKey {
    pub fn new(text: impl Into<String>, source: &Language, target: &Language) -> Self {
        Self {
            text: text.into(),
            source: source.code.to_string(),
            target: target.code.to_string(),
        }
    }

    /// Stable string form used as the key in the cache file.
    pub fn identity(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.source.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.target.as_bytes());
        hasher.update(&[0]);
        hasher.update(self.text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }
}

/// On-disk shape of the cache: identity → translated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
struct CacheFile {
    entries: BTreeMap<String, String>,
}

impl Parser for CacheFile {
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Options for a translation batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    pub punctuation: PunctuationMode,
}

impl TranslateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_punctuation(mut self, punctuation: PunctuationMode) -> Self {
        self.punctuation = punctuation;
        self
    }
}

/// How a single query was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// Empty input, returned as is.
    Bypassed,
    /// Served from the cache.
    Hit,
    /// Sent to the translator.
    Translated,
}

/// Result of [`TranslationCache::translate_batch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTranslation {
    /// One translation per input query, in input order.
    pub translations: Vec<String>,
    pub cache_hits: usize,
    pub api_calls: usize,
}

#[derive(Default)]
struct CacheState {
    entries: BTreeMap<String, String>,
    /// Entries added since the last write to disk.
    dirty: bool,
}

pub struct TranslationCache {
    path: Option<PathBuf>,
    state: Mutex<CacheState>,
    writes: AtomicUsize,
}

impl TranslationCache {
    /// A cache that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(CacheState::default()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Opens the cache file at `path`, starting empty when it does not exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let entries = match CacheFile::read_from(path) {
            Ok(file) => file.entries,
            Err(Error::FileNotFound { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened translation cache");
        Ok(Self {
            path: Some(path.to_path_buf()),
            state: Mutex::new(CacheState {
                entries,
                dirty: false,
            }),
            writes: AtomicUsize::new(0),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn contains(&self, key: &TranslationCacheKey) -> bool {
        self.lock().entries.contains_key(&key.identity())
    }

    pub fn get(&self, key: &TranslationCacheKey) -> Option<String> {
        self.lock().entries.get(&key.identity()).cloned()
    }

    /// Stores `value` unless the key already has an entry, persisting the
    /// cache when it is file backed. Returns the value now stored.
    pub fn insert(&self, key: &TranslationCacheKey, value: String) -> Result<String, Error> {
        let stored = self.store(key, value);
        self.flush()?;
        Ok(stored)
    }

    /// Writes pending entries to the cache file. Does nothing for an
    /// in-memory cache or when nothing changed since the last write.
    pub fn flush(&self) -> Result<(), Error> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let mut state = self.lock();
        if !state.dirty {
            return Ok(());
        }
        CacheFile {
            entries: state.entries.clone(),
        }
        .write_to(path)?;
        state.dirty = false;
        let writes = self.writes.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(path = %path.display(), entries = state.entries.len(), writes, "persisted translation cache");
        Ok(())
    }

    /// Translates one string, consulting the cache first.
    pub async fn translate<T: Translator + ?Sized>(
        &self,
        translator: &T,
        text: &str,
        source: &Language,
        target: &Language,
        options: TranslateOptions,
    ) -> Result<(String, Lookup), Error> {
        let answer = self.lookup(translator, text, source, target, options).await?;
        if answer.1 == Lookup::Translated {
            self.flush()?;
        }
        Ok(answer)
    }

    /// Translates a batch. Distinct queries run concurrently; the first
    /// failure aborts the batch, while entries cached by queries that already
    /// finished stay cached. The cache file is written once when the batch
    /// settles, whether it succeeded or not.
    pub async fn translate_batch<T: Translator + ?Sized, S: AsRef<str>>(
        &self,
        translator: &T,
        queries: &[S],
        source: &Language,
        target: &Language,
        options: TranslateOptions,
    ) -> Result<BatchTranslation, Error> {
        let mut seen = HashSet::new();
        let distinct: Vec<&str> = queries
            .iter()
            .map(AsRef::as_ref)
            .filter(|query| seen.insert(*query))
            .collect();

        let answers = try_join_all(
            distinct
                .iter()
                .map(|query| self.lookup(translator, query, source, target, options)),
        )
        .await;
        let flushed = self.flush();
        let answers = answers?;
        flushed?;

        let mut batch = BatchTranslation::default();
        let mut by_query = HashMap::with_capacity(distinct.len());
        for (query, (translation, lookup)) in distinct.iter().zip(answers) {
            match lookup {
                Lookup::Hit => batch.cache_hits += 1,
                Lookup::Translated => batch.api_calls += 1,
                Lookup::Bypassed => {}
            }
            by_query.insert(*query, translation);
        }
        batch.translations = queries
            .iter()
            .map(|query| by_query.get(query.as_ref()).cloned().unwrap_or_default())
            .collect();

        debug!(
            source = source.code,
            target = target.code,
            queries = queries.len(),
            cache_hits = batch.cache_hits,
            api_calls = batch.api_calls,
            "translated batch"
        );
        Ok(batch)
    }

    /// Cache lookup, then translator call on a miss. New entries are stored
    /// in memory only; callers decide when to [`flush`](Self::flush).
    async fn lookup<T: Translator + ?Sized>(
        &self,
        translator: &T,
        text: &str,
        source: &Language,
        target: &Language,
        options: TranslateOptions,
    ) -> Result<(String, Lookup), Error> {
        if text.is_empty() {
            return Ok((String::new(), Lookup::Bypassed));
        }

        let key = TranslationCacheKey::new(text, source, target);
        if let Some(hit) = self.get(&key) {
            debug!(source = source.code, target = target.code, "cache hit");
            return Ok((hit, Lookup::Hit));
        }

        let encoded = placeholder::encode(text).map_err(Error::into_translation_failure)?;
        debug!(source = source.code, target = target.code, "cache miss, calling translator");
        let raw = translator
            .translate(&encoded.text, source, target)
            .await
            .map_err(|e| {
                Error::translation_error(
                    format!("{} -> {}: {}", source.code, target.code, e),
                    Some(e),
                )
            })?;
        let decoded = encoded.decode(&raw, options.punctuation);
        Ok((self.store(&key, decoded), Lookup::Translated))
    }

    /// First write wins. Returns the value now stored.
    fn store(&self, key: &TranslationCacheKey, value: String) -> String {
        let mut state = self.lock();
        let identity = key.identity();
        if let Some(existing) = state.entries.get(&identity) {
            return existing.clone();
        }
        state.entries.insert(identity, value.clone());
        state.dirty = true;
        value
    }

    #[cfg(test)]
    fn writes(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
