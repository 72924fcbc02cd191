use std::path::Path;

use arbsync::Language;
use unic_langid::LanguageIdentifier;

/// Validate file path exists and is readable
pub fn validate_file_path(path: &Path) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("File does not exist: {}", path.display()));
    }

    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }

    Ok(())
}

/// Validate that the ARB directory exists
pub fn validate_directory(path: &Path) -> Result<(), String> {
    if !path.is_dir() {
        return Err(format!("ARB directory does not exist: {}", path.display()));
    }
    Ok(())
}

/// Validate language code syntax with unic-langid, then require it to be in
/// the language catalog.
pub fn validate_language_code(lang: &str) -> Result<(), String> {
    if lang.trim().is_empty() {
        return Err("Language code cannot be empty".to_string());
    }

    // ARB codes use `_` as separator; BCP 47 uses `-`.
    let bcp47 = lang.trim().replace('_', "-");
    if bcp47.parse::<LanguageIdentifier>().is_err() {
        return Err(format!(
            "Invalid language code format: {}. Expected valid BCP 47 language identifier",
            lang
        ));
    }

    Language::from_code(lang).map(|_| ()).map_err(|_| {
        format!(
            "Unsupported language: {}. Run `arbsync languages` for the supported list",
            lang
        )
    })
}

/// Validate that old/new key lists pair up and contain no empty keys
pub fn validate_key_lists(old: &[String], new: &[String]) -> Result<(), String> {
    if old.len() != new.len() {
        return Err(format!(
            "--old and --new must be given the same number of times ({} vs {})",
            old.len(),
            new.len()
        ));
    }
    validate_keys(old)?;
    validate_keys(new)
}

pub fn validate_keys(keys: &[String]) -> Result<(), String> {
    if keys.is_empty() {
        return Err("At least one key is required".to_string());
    }
    if let Some(key) = keys.iter().find(|key| !arbsync::types::is_translatable_key(key)) {
        return Err(format!("Not a translatable key: '{}'", key));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_language_code() {
        assert!(validate_language_code("fr").is_ok());
        assert!(validate_language_code("pt_BR").is_ok());
        assert!(validate_language_code("zh-TW").is_ok());
        assert!(validate_language_code("").is_err());
        assert!(validate_language_code("not a code").is_err());
        let err = validate_language_code("xx").unwrap_err();
        assert!(err.contains("Unsupported language"));
    }

    #[test]
    fn test_validate_key_lists() {
        let old = vec!["a".to_string()];
        assert!(validate_key_lists(&old, &["b".to_string()]).is_ok());
        assert!(validate_key_lists(&old, &[]).is_err());
        assert!(validate_key_lists(&old, &["@b".to_string()]).is_err());
    }

    #[test]
    fn test_validate_file_path() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(validate_file_path(dir.path()).is_err());
        assert!(validate_file_path(&dir.path().join("missing.arb")).is_err());
        let file = dir.path().join("intl_en.arb");
        std::fs::write(&file, "{}").unwrap();
        assert!(validate_file_path(&file).is_ok());
    }
}
