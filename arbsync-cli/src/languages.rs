use arbsync::Language;

pub fn print_languages(json_output: bool) {
    if json_output {
        println!(
            "{}",
            serde_json::to_string_pretty(Language::all()).unwrap_or_default()
        );
        return;
    }

    println!("=== Supported languages ({}) ===", Language::all().len());
    for language in Language::all() {
        let direction = if language.is_rtl() { "  [rtl]" } else { "" };
        println!("  {:<8} {}{}", language.code, language.name, direction);
    }
}
