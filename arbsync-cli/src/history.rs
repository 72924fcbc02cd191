use arbsync::IdentityTranslator;
use arbsync_cli::{Config, validation::validate_keys};
use serde_json::json;

/// Lists source keys whose value changed since the last successful run.
pub fn print_changes(config: &Config, json_output: bool) -> Result<(), String> {
    let synchronizer = config.synchronizer(IdentityTranslator)?;
    let source = synchronizer.read_source().map_err(|e| e.to_string())?;
    let history = synchronizer.load_history().map_err(|e| e.to_string())?;
    let changed = history.compare(&source);

    if json_output {
        let body = json!({
            "changed": changed.len(),
            "keys": changed,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        return Ok(());
    }

    if changed.is_empty() {
        println!("No changes since the last run");
    } else {
        println!("Changed keys ({}):", changed.len());
        for key in &changed {
            println!("  {}", key);
        }
    }
    Ok(())
}

/// Records the current source value of `keys` so they are not retranslated.
pub fn run_exclude(config: &Config, keys: &[String]) -> Result<(), String> {
    validate_keys(keys)?;
    let synchronizer = config.synchronizer(IdentityTranslator)?;
    let source = synchronizer.read_source().map_err(|e| e.to_string())?;
    if let Some(missing) = keys.iter().find(|key| source.get_str(key).is_none()) {
        return Err(format!("Key '{}' not found in source file", missing));
    }
    let marked = synchronizer
        .mark_excluded(keys)
        .map_err(|e| e.to_string())?;
    println!("✅ Excluded {} key(s) from retranslation", marked);
    Ok(())
}
