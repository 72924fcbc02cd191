use arbsync::SyncReport;
use arbsync_cli::{Config, GoogleTranslator, config::API_KEY_ENV};
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::stats::render_statistics;

/// Translates every target language that needs it. `dry_run` only prints the
/// plan.
pub async fn run_translate(
    config: &Config,
    langs: &[String],
    dry_run: bool,
    json_output: bool,
) -> Result<(), String> {
    let targets = config.target_languages(langs)?;

    if dry_run {
        let synchronizer = config.synchronizer(arbsync::IdentityTranslator)?;
        let statistics = synchronizer.plan(&targets).map_err(|e| e.to_string())?;
        render_statistics(&statistics, json_output);
        return Ok(());
    }

    let api_key = config.api_key().ok_or_else(|| {
        format!(
            "No translation API key: set {} or google_api_key in the config file",
            API_KEY_ENV
        )
    })?;
    let synchronizer = config.synchronizer(GoogleTranslator::new(api_key)?)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, stopping after the current language");
            on_interrupt.cancel();
        }
    });

    let report = synchronizer
        .run(&targets, &cancel)
        .await
        .map_err(|e| format!("Translation failed: {}", e))?;
    render_report(&report, json_output);

    if report.cancelled {
        return Err("Cancelled; history was not updated".to_string());
    }
    Ok(())
}

fn render_report(report: &SyncReport, json_output: bool) {
    if json_output {
        let body = json!({
            "summary": {
                "languages": report.outcomes.len(),
                "api_calls": report.api_calls(),
                "cache_hits": report.cache_hits(),
                "cancelled": report.cancelled,
                "history_updated": report.history_updated,
            },
            "languages": report.outcomes,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        return;
    }

    println!("=== Translate ===");
    for outcome in &report.outcomes {
        let action = &outcome.statistic.action;
        let status = if outcome.written { "✅" } else { "·" };
        println!(
            "{} {}: create {}, update {}, retain {}, delete {} (calls {}, cache hits {})",
            status,
            outcome.language,
            action.create,
            action.update,
            action.retain,
            action.delete,
            outcome.api_calls,
            outcome.cache_hits
        );
    }
    println!(
        "Translator calls: {}, cache hits: {}",
        report.api_calls(),
        report.cache_hits()
    );
    if report.history_updated {
        println!("History updated");
    }
}
