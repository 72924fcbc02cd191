//! `arbsync.toml` project configuration.
//!
//! Every field is optional. Relative paths are resolved against the directory
//! holding the configuration file, so the CLI can be run from anywhere.

use std::path::{Path, PathBuf};

use arbsync::{
    ArbDocument, ArbLayout, Language, PunctuationMode, Synchronizer, TranslateOptions,
    TranslationCache, Translator, ValidationOptions,
};
use serde::Deserialize;

/// Environment variable that overrides `google_api_key`.
pub const API_KEY_ENV: &str = "ARBSYNC_GOOGLE_API_KEY";

pub const DEFAULT_CONFIG_FILE: &str = "arbsync.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory holding the ARB files.
    pub arb_dir: PathBuf,
    /// File name prefix: `<arb_dir>/<arb_prefix><code>.arb`.
    pub arb_prefix: String,
    pub source_language: String,
    /// Languages to synchronize. Empty means every ARB file found in
    /// `arb_dir`.
    pub target_languages: Vec<String>,
    pub history_path: PathBuf,
    pub cache_path: PathBuf,
    /// Terms that translations must keep verbatim.
    pub exclude_terms: Vec<String>,
    pub check_line_breaks: bool,
    pub normalize_punctuation: bool,
    pub google_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            arb_dir: PathBuf::from("lib/l10n"),
            arb_prefix: "intl_".to_string(),
            source_language: "en".to_string(),
            target_languages: Vec::new(),
            history_path: PathBuf::from(".arbsync/history.json"),
            cache_path: PathBuf::from(".arbsync/cache.json"),
            exclude_terms: Vec::new(),
            check_line_breaks: false,
            normalize_punctuation: false,
            google_api_key: None,
        }
    }
}

impl Config {
    /// Loads `path`. A missing file yields the defaults, resolved against the
    /// file's directory.
    pub fn load(path: &Path) -> Result<Self, String> {
        let config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text)
                .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(format!("Cannot read config {}: {}", path.display(), e)),
        };
        let base = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(config.resolved_against(base))
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    fn resolved_against(mut self, base: &Path) -> Self {
        for path in [&mut self.arb_dir, &mut self.history_path, &mut self.cache_path] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }

    pub fn layout(&self) -> ArbLayout {
        ArbLayout::new(&self.arb_dir, &self.arb_prefix)
    }

    pub fn source_language(&self) -> Result<&'static Language, String> {
        Language::from_code(&self.source_language).map_err(|e| e.to_string())
    }

    /// Target languages: the explicit `requested` list, else the configured
    /// list, else every discovered ARB file. The source language is never a
    /// target.
    pub fn target_languages(&self, requested: &[String]) -> Result<Vec<&'static Language>, String> {
        let source = self.source_language()?;
        let languages = if !requested.is_empty() {
            parse_languages(requested)?
        } else if !self.target_languages.is_empty() {
            parse_languages(&self.target_languages)?
        } else {
            self.layout()
                .discover_languages()
                .map_err(|e| e.to_string())?
        };
        Ok(languages
            .into_iter()
            .filter(|language| language.code != source.code)
            .collect())
    }

    pub fn translate_options(&self) -> TranslateOptions {
        let punctuation = if self.normalize_punctuation {
            PunctuationMode::Normalize
        } else {
            PunctuationMode::Preserve
        };
        TranslateOptions::new().with_punctuation(punctuation)
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions::new()
            .with_exclude_terms(self.exclude_terms.iter().cloned())
            .with_line_breaks(self.check_line_breaks)
    }

    pub fn read_source(&self) -> Result<ArbDocument, String> {
        let layout = self.layout();
        let source = self.source_language()?;
        crate::validation::validate_file_path(&layout.path_for(source))?;
        layout.read(source).map_err(|e| e.to_string())
    }

    /// A synchronizer over this project, with the file-backed cache opened.
    pub fn synchronizer<T: Translator>(&self, translator: T) -> Result<Synchronizer<T>, String> {
        crate::validation::validate_directory(&self.arb_dir)?;
        let cache = TranslationCache::open(&self.cache_path).map_err(|e| e.to_string())?;
        Ok(Synchronizer::new(
            self.layout(),
            self.source_language()?,
            &self.history_path,
            cache,
            translator,
        )
        .with_options(self.translate_options()))
    }

    /// The API key, with the environment taking precedence over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.google_api_key.clone())
    }
}

fn parse_languages(codes: &[String]) -> Result<Vec<&'static Language>, String> {
    let mut languages: Vec<&'static Language> = Vec::with_capacity(codes.len());
    for code in codes {
        crate::validation::validate_language_code(code)?;
        let language = Language::from_code(code).map_err(|e| e.to_string())?;
        if !languages.iter().any(|seen| seen.code == language.code) {
            languages.push(language);
        }
    }
    Ok(languages)
}
