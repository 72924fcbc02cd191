use arbsync::{IdentityTranslator, LanguageStatistic};
use arbsync_cli::Config;
use serde_json::json;

/// Shows what a translation run would do, per target language.
pub fn print_stats(config: &Config, langs: &[String], json_output: bool) -> Result<(), String> {
    let synchronizer = config.synchronizer(IdentityTranslator)?;
    let targets = config.target_languages(langs)?;
    let statistics = synchronizer.plan(&targets).map_err(|e| e.to_string())?;
    render_statistics(&statistics, json_output);
    Ok(())
}

pub fn render_statistics(statistics: &[LanguageStatistic], json_output: bool) {
    let requiring = statistics
        .iter()
        .filter(|statistic| statistic.is_translation_required())
        .count();
    let api_calls_needed: usize = statistics.iter().map(|s| s.api.api_calls_needed).sum();
    let cache_hits: usize = statistics.iter().map(|s| s.api.cache_hits).sum();

    if json_output {
        let body = json!({
            "summary": {
                "languages": statistics.len(),
                "translation_required": requiring,
                "api_calls_needed": api_calls_needed,
                "cache_hits": cache_hits,
            },
            "languages": statistics,
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
        return;
    }

    println!("=== Stats ===");
    println!("Languages: {}", statistics.len());
    println!("Requiring translation: {}", requiring);
    println!(
        "Translator calls needed: {} (cache hits: {})",
        api_calls_needed, cache_hits
    );

    for statistic in statistics {
        let action = &statistic.action;
        println!("\nLanguage: {}", statistic.language);
        if !statistic.target_exists {
            println!("  (file will be created)");
        }
        println!(
            "  create: {}  update: {}  retain: {}  delete: {}",
            action.create, action.update, action.retain, action.delete
        );
        println!(
            "  translator calls: {}  cache hits: {}",
            statistic.api.api_calls_needed, statistic.api.cache_hits
        );
    }
}
