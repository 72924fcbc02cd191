use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};

use arbsync::{
    ArbLayout, BoxError, Error, History, InvalidType, Language, Synchronizer, TranslationCache,
    Translator, Validation, ValidationOptions,
};
use async_trait::async_trait;
use serde_json::Value;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

/// Prefixes every text with the target code and counts calls.
#[derive(Default)]
struct TaggingTranslator {
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

#[async_trait]
impl Translator for TaggingTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &Language,
        target: &Language,
    ) -> Result<String, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(text.to_string());
        Ok(format!("{}: {}", target.code, text))
    }
}

/// Cancels the run on the first call, but still answers.
struct CancellingTranslator {
    token: CancellationToken,
}

#[async_trait]
impl Translator for CancellingTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: &Language,
        _target: &Language,
    ) -> Result<String, BoxError> {
        self.token.cancel();
        Ok(text.to_uppercase())
    }
}

struct BrokenTranslator;

#[async_trait]
impl Translator for BrokenTranslator {
    async fn translate(
        &self,
        _text: &str,
        _source: &Language,
        _target: &Language,
    ) -> Result<String, BoxError> {
        Err("quota exceeded".into())
    }
}

fn lang(code: &str) -> &'static Language {
    Language::from_code(code).unwrap()
}

fn read_json(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

struct Project {
    dir: TempDir,
    layout: ArbLayout,
}

impl Project {
    fn new(source: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let layout = ArbLayout::new(dir.path().join("l10n"), "intl_");
        fs::create_dir_all(&layout.directory).unwrap();
        fs::write(layout.path_for(lang("en")), source).unwrap();
        Self { dir, layout }
    }

    fn history_path(&self) -> std::path::PathBuf {
        self.dir.path().join("history.json")
    }

    fn synchronizer<T: Translator>(&self, translator: T) -> Synchronizer<T> {
        Synchronizer::new(
            self.layout.clone(),
            lang("en"),
            self.history_path(),
            TranslationCache::open(self.dir.path().join("cache.json")).unwrap(),
            translator,
        )
    }

    fn target(&self, code: &str) -> Value {
        read_json(&self.layout.path_for(lang(code)))
    }
}

const SOURCE: &str = r#"{
  "@@locale": "en",
  "hello": "Hello {name}",
  "@hello": {"placeholders": {"name": {}}},
  "bye": "Bye"
}"#;

#[tokio::test]
async fn first_run_creates_targets_and_history() {
    let project = Project::new(SOURCE);
    let translator = Arc::new(TaggingTranslator::default());
    let sync = project.synchronizer(translator.clone());

    let report = sync
        .run(&[lang("fr"), lang("ja")], &CancellationToken::new())
        .await
        .unwrap();

    assert!(!report.cancelled);
    assert!(report.history_updated);
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.api_calls(), 4);
    assert_eq!(report.outcomes[0].statistic.action.create, 2);

    let fr = project.target("fr");
    assert_eq!(fr["@@locale"], "fr");
    assert_eq!(fr["hello"], "fr: Hello {name}");
    assert!(fr.get("@hello").is_none());
    let keys: Vec<&String> = fr.as_object().unwrap().keys().collect();
    assert_eq!(keys, vec!["@@locale", "hello", "bye"]);

    let history = History::load(project.history_path()).unwrap();
    assert_eq!(history.get("hello"), Some("Hello {name}"));

    assert_eq!(translator.calls.load(Ordering::SeqCst), 4);
    let seen = translator.seen.lock().unwrap();
    assert!(seen.iter().all(|text| !text.contains("{name}")));
    assert!(seen.iter().any(|text| text == "Hello 🍎"));
}

#[tokio::test]
async fn second_run_only_translates_changed_keys() {
    let project = Project::new(SOURCE);
    project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();

    fs::write(
        project.layout.path_for(lang("en")),
        r#"{"@@locale": "en", "hello": "Hi {name}", "bye": "Bye"}"#,
    )
    .unwrap();

    let report = project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();

    let outcome = &report.outcomes[0];
    assert_eq!(outcome.statistic.action.update, 1);
    assert_eq!(outcome.statistic.action.retain, 1);
    assert_eq!(outcome.api_calls, 1);
    assert_eq!(project.target("fr")["hello"], "fr: Hi {name}");
    assert_eq!(project.target("fr")["bye"], "fr: Bye");
}

#[tokio::test]
async fn unchanged_project_only_fixes_locale() {
    let project = Project::new(SOURCE);
    project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();

    let path = project.layout.path_for(lang("fr"));
    let mut fr = project.target("fr");
    fr["@@locale"] = Value::String("en".into());
    fs::write(&path, serde_json::to_string(&fr).unwrap()).unwrap();

    let report = project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.api_calls(), 0);
    assert!(report.outcomes[0].written);
    assert_eq!(project.target("fr")["@@locale"], "fr");
}

#[tokio::test]
async fn cache_serves_repeated_texts_across_runs() {
    let project = Project::new(SOURCE);
    project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("de")], &CancellationToken::new())
        .await
        .unwrap();
    fs::remove_file(project.layout.path_for(lang("de"))).unwrap();

    let report = project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("de")], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(report.api_calls(), 0);
    assert_eq!(report.cache_hits(), 2);
    assert_eq!(project.target("de")["bye"], "de: Bye");
}

#[tokio::test]
async fn cancellation_stops_at_language_boundary() {
    let project = Project::new(SOURCE);
    let token = CancellationToken::new();
    let sync = project.synchronizer(CancellingTranslator {
        token: token.clone(),
    });

    let report = sync.run(&[lang("fr"), lang("es")], &token).await.unwrap();

    assert!(report.cancelled);
    assert!(!report.history_updated);
    assert_eq!(report.outcomes.len(), 1);
    assert_eq!(project.target("fr")["bye"], "BYE");
    assert!(!project.layout.path_for(lang("es")).exists());
    assert!(!project.history_path().exists());
}

#[tokio::test]
async fn translator_failure_aborts_without_touching_history() {
    let project = Project::new(SOURCE);
    let err = project
        .synchronizer(BrokenTranslator)
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Translation { .. }));
    assert!(!project.history_path().exists());
    assert!(!project.layout.path_for(lang("fr")).exists());
}

#[tokio::test]
async fn missing_source_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let sync = Synchronizer::new(
        ArbLayout::new(dir.path(), "intl_"),
        lang("en"),
        dir.path().join("history.json"),
        TranslationCache::in_memory(),
        TaggingTranslator::default(),
    );
    let err = sync
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[tokio::test]
async fn synchronized_targets_validate_cleanly() {
    let project = Project::new(SOURCE);
    project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();

    let source = project.layout.read(lang("en")).unwrap();
    let fr = project.layout.read(lang("fr")).unwrap();
    let validation = Validation::new(&source, [&fr], ValidationOptions::new());
    assert_eq!(validation.iter().count(), 0);

    fs::write(
        project.layout.path_for(lang("fr")),
        r#"{"@@locale": "fr", "hello": "Bonjour", "bye": "Salut &amp; au revoir"}"#,
    )
    .unwrap();
    let fr = project.layout.read(lang("fr")).unwrap();
    let validation = Validation::new(&source, [&fr], ValidationOptions::new());
    let kinds: Vec<InvalidType> = validation.iter().map(|r| r.invalid_type).collect();
    assert_eq!(
        kinds,
        vec![
            InvalidType::InvalidParameters,
            InvalidType::UndecodedHtmlEntityExists
        ]
    );
}

#[tokio::test]
async fn mark_excluded_suppresses_retranslation() {
    let project = Project::new(SOURCE);
    project
        .synchronizer(TaggingTranslator::default())
        .run(&[lang("fr")], &CancellationToken::new())
        .await
        .unwrap();
    fs::write(
        project.layout.path_for(lang("en")),
        r#"{"@@locale": "en", "hello": "Hello {name}", "bye": "Bye!"}"#,
    )
    .unwrap();

    let sync = project.synchronizer(TaggingTranslator::default());
    assert_eq!(sync.mark_excluded(&["bye"]).unwrap(), 1);
    let plan = sync.plan(&[lang("fr")]).unwrap();
    assert!(!plan[0].is_translation_required());
}
