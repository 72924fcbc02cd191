//! Reading, writing and locating ARB files on disk.
//!
//! Documents are read fresh for every operation; nothing here caches file
//! contents between calls.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{
    error::Error,
    language::Language,
    traits::Parser,
    types::{ArbDocument, Entries},
};

/// Reads an ARB file. A missing file is [`Error::FileNotFound`], malformed
/// JSON is [`Error::Parse`] carrying the path and parser message.
pub fn read_document<P: AsRef<Path>>(
    path: P,
    language: &'static Language,
) -> Result<ArbDocument, Error> {
    let path = path.as_ref();
    let entries = Entries::read_from(path)?;
    ArbDocument::from_entries(path, language, entries)
        .map_err(|e| Error::parse_error(path, e.to_string()))
}

/// Like [`read_document`] but maps a missing file to `None`.
pub fn read_document_if_exists<P: AsRef<Path>>(
    path: P,
    language: &'static Language,
) -> Result<Option<ArbDocument>, Error> {
    match read_document(path, language) {
        Ok(document) => Ok(Some(document)),
        Err(Error::FileNotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes the full map back as pretty JSON, in insertion order.
pub fn write_document(document: &ArbDocument) -> Result<(), Error> {
    debug!(path = %document.path.display(), keys = document.len(), "writing ARB file");
    document.entries().write_to(&document.path)
}

/// Reads the document at `path`, or creates and persists a seed document
/// (`{"@@locale": <code>}`) when the file does not exist yet.
pub fn create_if_absent<P: AsRef<Path>>(
    path: P,
    language: &'static Language,
) -> Result<ArbDocument, Error> {
    let path = path.as_ref();
    if let Some(document) = read_document_if_exists(path, language)? {
        return Ok(document);
    }
    let document = ArbDocument::seed(path, language);
    write_document(&document)?;
    Ok(document)
}

/// Where the ARB files of a project live: `<directory>/<prefix><code>.arb`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArbLayout {
    pub directory: PathBuf,
    pub prefix: String,
}

impl ArbLayout {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            prefix: prefix.into(),
        }
    }

    pub fn path_for(&self, language: &Language) -> PathBuf {
        self.directory
            .join(format!("{}{}.arb", self.prefix, language.code))
    }

    pub fn read(&self, language: &'static Language) -> Result<ArbDocument, Error> {
        read_document(self.path_for(language), language)
    }

    pub fn read_if_exists(
        &self,
        language: &'static Language,
    ) -> Result<Option<ArbDocument>, Error> {
        read_document_if_exists(self.path_for(language), language)
    }

    pub fn create_if_absent(&self, language: &'static Language) -> Result<ArbDocument, Error> {
        create_if_absent(self.path_for(language), language)
    }

    /// Languages that already have a file in the directory, in catalog
    /// order. Files whose suffix is not a known language are skipped.
    pub fn discover_languages(&self) -> Result<Vec<&'static Language>, Error> {
        let read_dir = match std::fs::read_dir(&self.directory) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::FileNotFound {
                    path: self.directory.clone(),
                });
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut found = Vec::new();
        for dir_entry in read_dir {
            let file_name = dir_entry?.file_name();
            let Some(code) = file_name
                .to_str()
                .and_then(|name| name.strip_prefix(self.prefix.as_str()))
                .and_then(|rest| rest.strip_suffix(".arb"))
            else {
                continue;
            };
            match Language::from_code(code) {
                Ok(language) => found.push(language),
                Err(_) => warn!(file = ?file_name, "skipping ARB file with unknown language"),
            }
        }

        found.sort_by_key(|language| {
            Language::all()
                .iter()
                .position(|candidate| candidate.code == language.code)
        });
        found.dedup();
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn lang(code: &str) -> &'static Language {
        Language::from_code(code).unwrap()
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl_fr.arb");
        let err = read_document(&path, lang("fr")).unwrap_err();
        assert!(matches!(err, Error::FileNotFound { path: p } if p == path));
    }

    #[test]
    fn test_read_malformed_json_carries_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl_fr.arb");
        std::fs::write(&path, "{ \"hello\": ").unwrap();
        let err = read_document(&path, lang("fr")).unwrap_err();
        match err {
            Error::Parse { path: p, message } => {
                assert_eq!(p, path);
                assert!(!message.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_write_preserves_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intl_en.arb");
        std::fs::write(&path, r#"{"@@locale":"en","zeta":"Z","alpha":"A"}"#).unwrap();

        let mut doc = read_document(&path, lang("en")).unwrap();
        doc.insert("beta", "B");
        write_document(&doc).unwrap();

        let reread = read_document(&path, lang("en")).unwrap();
        let keys: Vec<_> = reread.keys().collect();
        assert_eq!(keys, vec!["@@locale", "zeta", "alpha", "beta"]);
    }

    #[test]
    fn test_create_if_absent_seeds_locale() {
        let dir = TempDir::new().unwrap();
        let layout = ArbLayout::new(dir.path(), "intl_");
        let doc = layout.create_if_absent(lang("de")).unwrap();
        assert_eq!(doc.locale(), Some("de"));
        assert!(dir.path().join("intl_de.arb").exists());

        let content = std::fs::read_to_string(dir.path().join("intl_de.arb")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value, serde_json::json!({"@@locale": "de"}));
    }

    #[test]
    fn test_create_if_absent_keeps_existing() {
        let dir = TempDir::new().unwrap();
        let layout = ArbLayout::new(dir.path(), "app_");
        std::fs::write(layout.path_for(lang("fr")), r#"{"hello":"Bonjour"}"#).unwrap();
        let doc = layout.create_if_absent(lang("fr")).unwrap();
        assert_eq!(doc.get_str("hello"), Some("Bonjour"));
    }

    #[test]
    fn test_discover_languages() {
        let dir = TempDir::new().unwrap();
        for name in ["intl_en.arb", "intl_zh_TW.arb", "intl_xx.arb", "other.json"] {
            std::fs::write(dir.path().join(name), "{}").unwrap();
        }
        let layout = ArbLayout::new(dir.path(), "intl_");
        let codes: Vec<_> = layout
            .discover_languages()
            .unwrap()
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(codes, vec!["zh_TW", "en"]);
    }
}
