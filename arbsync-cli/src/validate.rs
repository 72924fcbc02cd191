use std::collections::BTreeMap;

use arbsync::{ArbDocument, InvalidType, Validation, decode_html_entities};
use arbsync_cli::Config;
use serde_json::json;
use tracing::warn;

/// Validates every existing target file against the source.
///
/// With `fix_html`, undecoded HTML entities are decoded and written back
/// before the report is produced. Remaining issues make the command fail.
pub fn run_validate(
    config: &Config,
    langs: &[String],
    fix_html: bool,
    json_output: bool,
) -> Result<(), String> {
    let source = config.read_source()?;
    let layout = config.layout();
    let mut targets: Vec<ArbDocument> = Vec::new();
    for language in config.target_languages(langs)? {
        match layout.read_if_exists(language).map_err(|e| e.to_string())? {
            Some(document) => targets.push(document),
            None => warn!(language = language.code, "no ARB file, skipping"),
        }
    }

    let mut fixed = 0;
    if fix_html {
        let mut pending: BTreeMap<usize, Vec<String>> = BTreeMap::new();
        {
            let validation = Validation::new(&source, &targets, config.validation_options());
            for result in validation.iter() {
                if result.invalid_type != InvalidType::UndecodedHtmlEntityExists {
                    continue;
                }
                if let Some(index) = targets
                    .iter()
                    .position(|target| std::ptr::eq(target, result.target))
                {
                    pending.entry(index).or_default().push(result.key);
                }
            }
        }
        for (index, keys) in pending {
            fixed += decode_html_entities(&mut targets[index], &keys).map_err(|e| e.to_string())?;
        }
    }

    let validation = Validation::new(&source, &targets, config.validation_options());
    let results: Vec<_> = validation.iter().collect();

    if json_output {
        let body = json!({
            "summary": {
                "targets": targets.len(),
                "issues": results.len(),
                "fixed_html_entities": fixed,
            },
            "issues": results,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        println!("=== Validation ===");
        println!("Targets checked: {}", targets.len());
        if fix_html {
            println!("HTML entities decoded: {}", fixed);
        }
        for result in &results {
            let kind = serde_json::to_value(result.invalid_type)
                .ok()
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default();
            match &result.message {
                Some(message) => println!(
                    "  [{}] {} {}: {}",
                    result.target.language.code, kind, result.key, message
                ),
                None => println!("  [{}] {} {}", result.target.language.code, kind, result.key),
            }
        }
        if results.is_empty() {
            println!("✅ No issues found");
        }
    }

    if results.is_empty() {
        Ok(())
    } else {
        Err(format!("{} validation issue(s) found", results.len()))
    }
}
