#![forbid(unsafe_code)]
//! Keeps Flutter-style ARB localization files in sync with a source language.
//!
//! A project has one source ARB file and one file per target language. arbsync
//! works out which keys changed since the last run, machine-translates only
//! those (through a persistent cache that shields ICU placeholders from the
//! translator), merges the result back into each target and validates the
//! translated files structurally.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use arbsync::{ArbLayout, IdentityTranslator, Language, Synchronizer, TranslationCache};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), arbsync::Error> {
//! let layout = ArbLayout::new("lib/l10n", "intl_");
//! let english = Language::from_code("en")?;
//! let targets = [Language::from_code("fr")?, Language::from_code("ja")?];
//!
//! let synchronizer = Synchronizer::new(
//!     layout,
//!     english,
//!     "lib/l10n/.arbsync_history.json",
//!     TranslationCache::open("lib/l10n/.arbsync_cache.json")?,
//!     IdentityTranslator,
//! );
//! let report = synchronizer.run(&targets, &CancellationToken::new()).await?;
//! println!("{} translator calls", report.api_calls());
//! # Ok(())
//! # }
//! ```
//!
//! # Building blocks
//!
//! - **Store** ([`store`], [`types`]): ordered ARB documents, atomic writes.
//! - **History** ([`history`]): source values as of the last successful run.
//! - **Statistics** ([`statistics`]): create / update / retain / delete per
//!   language, with cache-hit counts.
//! - **Cache** ([`cache`], [`placeholder`]): placeholder-safe, content
//!   addressed translation cache.
//! - **Validation** ([`validation`]): lazy structural checks of translations.
//! - **Sync** ([`sync`]) and key edits ([`operations`]).

pub mod cache;
pub mod error;
pub mod fingerprint;
pub mod history;
pub mod language;
pub mod operations;
pub mod placeholder;
pub mod statistics;
pub mod store;
pub mod sync;
pub mod traits;
pub mod translator;
pub mod types;
pub mod validation;

// Re-export most used types for easy consumption
pub use crate::{
    cache::{BatchTranslation, Lookup, TranslateOptions, TranslationCache, TranslationCacheKey},
    error::{BoxError, Error, ErrorCode},
    fingerprint::TextFingerprint,
    history::History,
    language::{Language, TextDirection},
    operations::{KeyEditReport, remove_in_project, remove_keys, rename_in_project, rename_keys},
    placeholder::{EncodedText, PunctuationMode},
    statistics::{
        ActionStatistic, ApiStatistic, LanguageStatistic, compute_statistic, compute_statistics,
    },
    store::{ArbLayout, create_if_absent, read_document, read_document_if_exists, write_document},
    sync::{LanguageOutcome, SyncReport, Synchronizer},
    traits::Parser,
    translator::{IdentityTranslator, Translator},
    types::{ArbDocument, Entries, KeyKind, LOCALE_KEY},
    validation::{
        InvalidType, Validation, ValidationOptions, ValidationResult, decode_html_entities,
    },
};
