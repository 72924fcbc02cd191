use arbsync::{KeyEditReport, remove_in_project, rename_in_project};
use arbsync_cli::{
    Config,
    validation::{validate_directory, validate_key_lists, validate_keys},
};
use serde_json::json;

pub fn run_rename(
    config: &Config,
    old: &[String],
    new: &[String],
    json_output: bool,
) -> Result<(), String> {
    validate_key_lists(old, new)?;
    validate_directory(&config.arb_dir)?;
    let report = rename_in_project(
        &config.layout(),
        config.source_language()?,
        &config.history_path,
        old,
        new,
    )
    .map_err(|e| e.to_string())?;

    if json_output {
        print_json("rename", &report);
    } else {
        for (old, new) in old.iter().zip(new) {
            println!("✅ Renamed '{}' to '{}'", old, new);
        }
        print_counts(&report);
    }
    Ok(())
}

pub fn run_remove(config: &Config, keys: &[String], json_output: bool) -> Result<(), String> {
    validate_keys(keys)?;
    validate_directory(&config.arb_dir)?;
    let report = remove_in_project(
        &config.layout(),
        config.source_language()?,
        &config.history_path,
        keys,
    )
    .map_err(|e| e.to_string())?;

    if json_output {
        print_json("remove", &report);
    } else {
        for key in keys {
            println!("✅ Removed '{}'", key);
        }
        print_counts(&report);
    }
    Ok(())
}

fn print_json(operation: &str, report: &KeyEditReport) {
    let body = json!({
        "operation": operation,
        "report": report,
    });
    println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
}

fn print_counts(report: &KeyEditReport) {
    println!(
        "Files changed: {}/{} (entries: {}, history: {})",
        report.documents_changed, report.documents, report.entries_changed, report.history_changed
    );
}
