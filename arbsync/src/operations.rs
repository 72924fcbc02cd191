//! Project-wide key edits (rename / remove) reusable by CLI and library users.
//!
//! Edits touch the source file, every target file and the history so the
//! renamed or removed keys are not picked up as changes by the next run.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::{
    error::Error,
    history::History,
    language::Language,
    store::{ArbLayout, write_document},
    traits::Parser,
    types::{ArbDocument, metadata_key_for},
};

/// Counters reported by [`rename_in_project`] and [`remove_in_project`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyEditReport {
    pub documents: usize,
    pub documents_changed: usize,
    /// Entries changed across all documents, metadata included.
    pub entries_changed: usize,
    pub history_changed: usize,
}

fn check_pairs<S: AsRef<str>>(old: &[S], new: &[S]) -> Result<(), Error> {
    if old.len() != new.len() {
        return Err(Error::KeyCountMismatch {
            old: old.len(),
            new: new.len(),
        });
    }
    Ok(())
}

/// Renames `old[i]` to `new[i]` (and `@old[i]` to `@new[i]`) in every
/// document, keeping key positions. Mismatched list lengths are rejected
/// before anything is touched. Returns the number of renamed entries.
pub fn rename_keys<S: AsRef<str>>(
    documents: &mut [ArbDocument],
    old: &[S],
    new: &[S],
) -> Result<usize, Error> {
    check_pairs(old, new)?;
    let mut renamed = 0;
    for document in documents.iter_mut() {
        renamed += rename_in_document(document, old, new);
    }
    Ok(renamed)
}

fn rename_in_document<S: AsRef<str>>(document: &mut ArbDocument, old: &[S], new: &[S]) -> usize {
    let mut renamed = 0;
    for (old, new) in old.iter().zip(new) {
        let (old, new) = (old.as_ref(), new.as_ref());
        renamed += usize::from(document.rename_key(old, new));
        renamed += usize::from(document.rename_key(&metadata_key_for(old), &metadata_key_for(new)));
    }
    renamed
}

/// Removes every key in `keys` and its `@key` metadata from every document.
/// Returns the number of removed entries.
pub fn remove_keys<S: AsRef<str>>(documents: &mut [ArbDocument], keys: &[S]) -> usize {
    documents
        .iter_mut()
        .map(|document| remove_from_document(document, keys))
        .sum()
}

fn remove_from_document<S: AsRef<str>>(document: &mut ArbDocument, keys: &[S]) -> usize {
    let mut removed = 0;
    for key in keys {
        let key = key.as_ref();
        removed += usize::from(document.remove(key).is_some());
        removed += usize::from(document.remove(&metadata_key_for(key)).is_some());
    }
    removed
}

/// Loads the source file and every discovered target of `layout`.
fn load_project(
    layout: &ArbLayout,
    source_language: &'static Language,
) -> Result<Vec<ArbDocument>, Error> {
    let mut documents = vec![layout.read(source_language)?];
    for language in layout.discover_languages()? {
        if language.code != source_language.code {
            documents.push(layout.read(language)?);
        }
    }
    Ok(documents)
}

fn persist_changed(
    documents: &[ArbDocument],
    changed: &[bool],
    report: &mut KeyEditReport,
) -> Result<(), Error> {
    report.documents = documents.len();
    for (document, _) in documents.iter().zip(changed).filter(|(_, changed)| **changed) {
        write_document(document)?;
        report.documents_changed += 1;
    }
    Ok(())
}

/// Renames keys in the source, all targets and the history, then persists
/// whatever changed.
pub fn rename_in_project<S: AsRef<str>>(
    layout: &ArbLayout,
    source_language: &'static Language,
    history_path: &Path,
    old: &[S],
    new: &[S],
) -> Result<KeyEditReport, Error> {
    check_pairs(old, new)?;
    let mut documents = load_project(layout, source_language)?;
    let mut history = History::load(history_path)?;

    let mut report = KeyEditReport::default();
    let mut changed = Vec::with_capacity(documents.len());
    for document in documents.iter_mut() {
        let count = rename_in_document(document, old, new);
        report.entries_changed += count;
        changed.push(count > 0);
    }
    for (old, new) in old.iter().zip(new) {
        report.history_changed += usize::from(history.rename_key(old.as_ref(), new.as_ref()));
    }

    persist_changed(&documents, &changed, &mut report)?;
    if report.history_changed > 0 {
        history.write_to(history_path)?;
    }
    info!(
        documents = report.documents_changed,
        entries = report.entries_changed,
        "renamed keys"
    );
    Ok(report)
}

/// Removes keys from the source, all targets and the history, then persists
/// whatever changed.
pub fn remove_in_project<S: AsRef<str>>(
    layout: &ArbLayout,
    source_language: &'static Language,
    history_path: &Path,
    keys: &[S],
) -> Result<KeyEditReport, Error> {
    let mut documents = load_project(layout, source_language)?;
    let mut history = History::load(history_path)?;

    let mut report = KeyEditReport::default();
    let mut changed = Vec::with_capacity(documents.len());
    for document in documents.iter_mut() {
        let count = remove_from_document(document, keys);
        report.entries_changed += count;
        changed.push(count > 0);
    }
    for key in keys {
        report.history_changed += usize::from(history.remove(key.as_ref()).is_some());
    }

    persist_changed(&documents, &changed, &mut report)?;
    if report.history_changed > 0 {
        history.write_to(history_path)?;
    }
    info!(
        documents = report.documents_changed,
        entries = report.entries_changed,
        "removed keys"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use tempfile::TempDir;

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
    fn test_rename_keeps_position_and_metadata() {
        let mut documents = vec![
            doc("en", json!({"@@locale": "en", "a": "A", "@a": {}, "b": "B"})),
            doc("fr", json!({"@@locale": "fr", "a": "A-fr", "b": "B-fr"})),
        ];
        let renamed = rename_keys(&mut documents, &["a"], &["alpha"]).unwrap();
        assert_eq!(renamed, 3);
        let keys: Vec<&str> = documents[0].keys().collect();
        assert_eq!(keys, vec!["@@locale", "alpha", "@alpha", "b"]);
        assert_eq!(documents[1].get_str("alpha"), Some("A-fr"));
    }

    #[test]
    fn test_rename_count_mismatch_mutates_nothing() {
        let mut documents = vec![doc("en", json!({"a": "A", "b": "B"}))];
        let err = rename_keys(&mut documents, &["a", "b"], &["x"]).unwrap_err();
        assert!(matches!(err, Error::KeyCountMismatch { old: 2, new: 1 }));
        assert!(documents[0].contains_key("a"));
        assert!(documents[0].contains_key("b"));
    }

    #[test]
    fn test_remove_drops_key_and_metadata() {
        let mut documents = vec![
            doc("en", json!({"a": "A", "@a": {}, "b": "B"})),
            doc("de", json!({"a": "A-de"})),
        ];
        assert_eq!(remove_keys(&mut documents, &["a", "missing"]), 3);
        assert!(!documents[0].contains_key("@a"));
        assert!(!documents[1].contains_key("a"));
        assert!(documents[0].contains_key("b"));
    }

    #[test]
    fn test_rename_in_project_updates_files_and_history() {
        let dir = TempDir::new().unwrap();
        let layout = ArbLayout::new(dir.path(), "intl_");
        let en = Language::from_code("en").unwrap();
        let fr = Language::from_code("fr").unwrap();
        std::fs::write(layout.path_for(en), r#"{"@@locale":"en","a":"A","@a":{}}"#).unwrap();
        std::fs::write(layout.path_for(fr), r#"{"@@locale":"fr","a":"A-fr"}"#).unwrap();
        let history_path = dir.path().join("history.json");
        std::fs::write(&history_path, r#"{"a":"A"}"#).unwrap();

        let report = rename_in_project(&layout, en, &history_path, &["a"], &["b"]).unwrap();
        assert_eq!(report.documents, 2);
        assert_eq!(report.documents_changed, 2);
        assert_eq!(report.entries_changed, 3);
        assert_eq!(report.history_changed, 1);

        assert_eq!(layout.read(fr).unwrap().get_str("b"), Some("A-fr"));
        let history = History::load(&history_path).unwrap();
        assert_eq!(history.get("b"), Some("A"));
        assert!(!history.contains_key("a"));
    }

    #[test]
    fn test_remove_in_project_leaves_untouched_files_alone() {
        let dir = TempDir::new().unwrap();
        let layout = ArbLayout::new(dir.path(), "intl_");
        let en = Language::from_code("en").unwrap();
        let ja = Language::from_code("ja").unwrap();
        std::fs::write(layout.path_for(en), r#"{"a":"A","b":"B"}"#).unwrap();
        std::fs::write(layout.path_for(ja), r#"{"b":"B-ja"}"#).unwrap();
        let history_path = dir.path().join("history.json");

        let report = remove_in_project(&layout, en, &history_path, &["a"]).unwrap();
        assert_eq!(report.documents_changed, 1);
        assert_eq!(report.history_changed, 0);
        assert!(!history_path.exists());
        assert!(!layout.read(en).unwrap().contains_key("a"));
    }
}
