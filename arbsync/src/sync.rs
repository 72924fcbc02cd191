//! Synchronizing target ARB files with the source file.
//!
//! A run loads the source and history once, then walks the requested target
//! languages in order: compute the statistic, translate what changed as one
//! batch through the cache, merge, write. History is only replaced after
//! every requested language finished and the run was not cancelled.

use std::{collections::HashMap, path::PathBuf};

use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    cache::{TranslateOptions, TranslationCache},
    error::Error,
    history::History,
    language::{Language, serialize_code},
    statistics::{LanguageStatistic, compute_statistic},
    store::{ArbLayout, read_document, write_document},
    traits::Parser,
    translator::Translator,
    types::{ArbDocument, Entries, KeyKind, LOCALE_KEY},
};

/// What happened to one target language during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageOutcome {
    #[serde(serialize_with = "serialize_code")]
    pub language: &'static Language,
    pub statistic: LanguageStatistic,
    pub cache_hits: usize,
    pub api_calls: usize,
    /// Whether the target file was rewritten.
    pub written: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub outcomes: Vec<LanguageOutcome>,
    /// The run stopped at a language boundary because it was cancelled.
    pub cancelled: bool,
    pub history_updated: bool,
}

impl SyncReport {
    pub fn api_calls(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.api_calls).sum()
    }

    pub fn cache_hits(&self) -> usize {
        self.outcomes.iter().map(|outcome| outcome.cache_hits).sum()
    }
}

/// Drives a project: source file, target files, history and cache.
pub struct Synchronizer<T> {
    layout: ArbLayout,
    source_language: &'static Language,
    history_path: PathBuf,
    cache: TranslationCache,
    translator: T,
    options: TranslateOptions,
}

impl<T: Translator> Synchronizer<T> {
    pub fn new(
        layout: ArbLayout,
        source_language: &'static Language,
        history_path: impl Into<PathBuf>,
        cache: TranslationCache,
        translator: T,
    ) -> Self {
        Self {
            layout,
            source_language,
            history_path: history_path.into(),
            cache,
            translator,
            options: TranslateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: TranslateOptions) -> Self {
        self.options = options;
        self
    }

    pub fn layout(&self) -> &ArbLayout {
        &self.layout
    }

    pub fn source_language(&self) -> &'static Language {
        self.source_language
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn read_source(&self) -> Result<ArbDocument, Error> {
        read_document(self.layout.path_for(self.source_language), self.source_language)
    }

    pub fn load_history(&self) -> Result<History, Error> {
        History::load(&self.history_path)
    }

    /// Computes the statistic of every requested language without
    /// translating or writing anything.
    pub fn plan(&self, targets: &[&'static Language]) -> Result<Vec<LanguageStatistic>, Error> {
        let source = self.read_source()?;
        let history = self.load_history()?;
        let mut statistics = Vec::with_capacity(targets.len());
        for &language in self.targets_without_source(targets) {
            let target = self.layout.read_if_exists(language)?;
            statistics.push(compute_statistic(
                &source,
                language,
                target.as_ref(),
                &history,
                &self.cache,
            ));
        }
        Ok(statistics)
    }

    /// Synchronizes every requested target language.
    ///
    /// Cancellation is checked once per language boundary; a language whose
    /// batch already started is finished and written first.
    pub async fn run(
        &self,
        targets: &[&'static Language],
        cancel: &CancellationToken,
    ) -> Result<SyncReport, Error> {
        let source = self.read_source()?;
        let mut history = self.load_history()?;
        let mut report = SyncReport::default();

        for &language in self.targets_without_source(targets) {
            if cancel.is_cancelled() {
                warn!(language = language.code, "synchronization cancelled");
                report.cancelled = true;
                break;
            }
            let outcome = self.sync_language(&source, language, &history).await?;
            info!(
                language = language.code,
                create = outcome.statistic.action.create,
                update = outcome.statistic.action.update,
                retain = outcome.statistic.action.retain,
                delete = outcome.statistic.action.delete,
                cache_hits = outcome.cache_hits,
                api_calls = outcome.api_calls,
                "synchronized language"
            );
            report.outcomes.push(outcome);
        }

        if !report.cancelled {
            history.replace_with(&source);
            history.write_to(&self.history_path)?;
            report.history_updated = true;
            debug!(path = %self.history_path.display(), keys = history.len(), "history updated");
        }
        Ok(report)
    }

    /// Records the current source value of `keys` in the history so their
    /// change is not translated.
    pub fn mark_excluded<S: AsRef<str>>(&self, keys: &[S]) -> Result<usize, Error> {
        let source = self.read_source()?;
        let mut history = self.load_history()?;
        let marked = history.mark_excluded(&source, keys);
        if marked > 0 {
            history.write_to(&self.history_path)?;
        }
        Ok(marked)
    }

    async fn sync_language(
        &self,
        source: &ArbDocument,
        language: &'static Language,
        history: &History,
    ) -> Result<LanguageOutcome, Error> {
        let existing = self.layout.read_if_exists(language)?;
        let statistic =
            compute_statistic(source, language, existing.as_ref(), history, &self.cache);
        let target_exists = existing.is_some();
        let mut target = existing
            .unwrap_or_else(|| ArbDocument::seed(self.layout.path_for(language), language));

        let mut outcome = LanguageOutcome {
            language,
            statistic,
            cache_hits: 0,
            api_calls: 0,
            written: false,
        };

        if !outcome.statistic.is_translation_required() {
            if target.sync_locale() || !target_exists {
                write_document(&target)?;
                outcome.written = true;
            }
            return Ok(outcome);
        }

        let keys: Vec<&str> = outcome.statistic.keys_to_translate().collect();
        let texts: Vec<&str> = keys
            .iter()
            .map(|key| source.get_str(key).unwrap_or_default())
            .collect();
        let batch = self
            .cache
            .translate_batch(
                &self.translator,
                &texts,
                source.language,
                language,
                self.options,
            )
            .await?;

        let fresh: HashMap<&str, String> = keys.into_iter().zip(batch.translations).collect();
        let merged = merge(source, &target, &fresh);
        target.replace_entries(merged);
        write_document(&target)?;

        outcome.cache_hits = batch.cache_hits;
        outcome.api_calls = batch.api_calls;
        outcome.written = true;
        Ok(outcome)
    }

    fn targets_without_source<'t>(
        &self,
        targets: &'t [&'static Language],
    ) -> impl Iterator<Item = &'t &'static Language> {
        let source_code = self.source_language.code;
        targets
            .iter()
            .filter(move |language| language.code != source_code)
    }
}

/// Builds the new target map in source key order.
///
/// `@@locale` is set to the target language, metadata comes from the target
/// only, translatable keys take a fresh translation or the existing target
/// value, and keys the source does not have are dropped.
pub fn merge(
    source: &ArbDocument,
    target: &ArbDocument,
    fresh: &HashMap<&str, String>,
) -> Entries {
    let mut merged = Entries::new();
    merged.insert(
        LOCALE_KEY.to_string(),
        Value::String(target.language.code.to_string()),
    );

    for key in source.keys() {
        let value = match KeyKind::of(key) {
            KeyKind::Locale => continue,
            KeyKind::Metadata => target.get(key).cloned(),
            KeyKind::Translatable => fresh
                .get(key)
                .map(|translation| Value::String(translation.clone()))
                .or_else(|| target.get(key).cloned()),
        };
        if let Some(value) = value {
            merged.insert(key.to_string(), value);
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(code: &str, value: Value) -> ArbDocument {
        let Value::Object(entries) = value else {
            panic!("object expected")
        };
        ArbDocument::from_entries(
            format!("intl_{code}.arb"),
            Language::from_code(code).unwrap(),
            entries,
        )
        .unwrap()
    }

    #[test]
    fn test_merge_follows_source_order_and_drops_orphans() {
        let source = doc(
            "en",
            json!({"@@locale": "en", "b": "B", "@b": {"description": "bee"}, "a": "A"}),
        );
        let target = doc(
            "fr",
            json!({"a": "A-fr", "@@locale": "en", "orphan": "x", "@b": {"description": "abeille"}}),
        );
        let mut fresh = HashMap::new();
        fresh.insert("b", "B-fr".to_string());

        let merged = merge(&source, &target, &fresh);
        let keys: Vec<&str> = merged.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@@locale", "b", "@b", "a"]);
        assert_eq!(merged["@@locale"], "fr");
        assert_eq!(merged["b"], "B-fr");
        assert_eq!(merged["@b"]["description"], "abeille");
        assert_eq!(merged["a"], "A-fr");
    }

    #[test]
    fn test_merge_does_not_copy_source_metadata() {
        let source = doc("en", json!({"a": "A", "@a": {"description": "x"}}));
        let target = doc("fr", json!({}));
        let mut fresh = HashMap::new();
        fresh.insert("a", "A-fr".to_string());

        let merged = merge(&source, &target, &fresh);
        assert!(!merged.contains_key("@a"));
        assert_eq!(merged["a"], "A-fr");
    }
}
