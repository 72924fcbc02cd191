//! Per-language classification of source keys into create / update / retain
//! / delete, with cache-hit accounting.
//!
//! This is a pure read: nothing is translated or written, so the numbers can
//! be shown to a user before deciding which languages to translate.

use serde::Serialize;

use crate::{
    cache::{TranslationCache, TranslationCacheKey},
    history::History,
    language::{Language, serialize_code},
    types::ArbDocument,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionStatistic {
    pub create: usize,
    pub update: usize,
    pub retain: usize,
    pub delete: usize,
}

impl ActionStatistic {
    /// `create + update + delete > 0`.
    pub fn is_translation_required(&self) -> bool {
        self.create + self.update + self.delete > 0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApiStatistic {
    pub api_calls_needed: usize,
    pub cache_hits: usize,
}

/// Classification of one target language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStatistic {
    #[serde(serialize_with = "serialize_code")]
    pub language: &'static Language,
    /// Whether the target file existed when the statistic was computed.
    pub target_exists: bool,
    pub action: ActionStatistic,
    pub api: ApiStatistic,
    pub create_keys: Vec<String>,
    pub update_keys: Vec<String>,
    pub retain_keys: Vec<String>,
    pub delete_keys: Vec<String>,
}

impl LanguageStatistic {
    pub fn is_translation_required(&self) -> bool {
        self.action.is_translation_required()
    }

    /// Keys that have to go through the translator: created keys first,
    /// then updated ones.
    pub fn keys_to_translate(&self) -> impl Iterator<Item = &str> {
        self.create_keys
            .iter()
            .chain(self.update_keys.iter())
            .map(String::as_str)
    }

    fn empty(language: &'static Language, target_exists: bool) -> Self {
        Self {
            language,
            target_exists,
            action: ActionStatistic::default(),
            api: ApiStatistic::default(),
            create_keys: Vec::new(),
            update_keys: Vec::new(),
            retain_keys: Vec::new(),
            delete_keys: Vec::new(),
        }
    }

    fn count_lookup(&mut self, cache: &TranslationCache, key: &TranslationCacheKey) {
        if cache.contains(key) {
            self.api.cache_hits += 1;
        } else {
            self.api.api_calls_needed += 1;
        }
    }
}

/// Classifies every translatable source key for one target language.
///
/// `target` is `None` when the target file does not exist yet.
pub fn compute_statistic(
    source: &ArbDocument,
    target_language: &'static Language,
    target: Option<&ArbDocument>,
    history: &History,
    cache: &TranslationCache,
) -> LanguageStatistic {
    let Some(target) = target else {
        let mut statistic = LanguageStatistic::empty(target_language, false);
        for (key, value) in source.translatable() {
            statistic.action.create += 1;
            statistic.create_keys.push(key.to_string());
            let cache_key = TranslationCacheKey::new(value, source.language, target_language);
            statistic.count_lookup(cache, &cache_key);
        }
        return statistic;
    };

    let mut statistic = LanguageStatistic::empty(target_language, true);

    statistic.delete_keys = target
        .keys()
        .filter(|key| !source.contains_key(key))
        .map(str::to_string)
        .collect();
    statistic.action.delete = statistic.delete_keys.len();

    for (key, value) in source.translatable() {
        let in_target = target.contains_key(key);
        if in_target && history.is_unchanged(key, value) {
            statistic.action.retain += 1;
            statistic.retain_keys.push(key.to_string());
            continue;
        }

        if in_target {
            statistic.action.update += 1;
            statistic.update_keys.push(key.to_string());
        } else {
            statistic.action.create += 1;
            statistic.create_keys.push(key.to_string());
        }
        let cache_key = TranslationCacheKey::new(value, source.language, target_language);
        statistic.count_lookup(cache, &cache_key);
    }

    statistic
}

/// Computes one statistic per target language, skipping the source
/// language itself.
pub fn compute_statistics(
    source: &ArbDocument,
    targets: &[(&'static Language, Option<&ArbDocument>)],
    history: &History,
    cache: &TranslationCache,
) -> Vec<LanguageStatistic> {
    targets
        .iter()
        .filter(|(language, _)| language.code != source.language.code)
        .map(|(language, target)| compute_statistic(source, *language, *target, history, cache))
        .collect()
}
