use anyhow::{Result, anyhow};
use isolang::Language;
use std::collections::BTreeMap;
use std::path::Path;

/// Language utilities for ISO language code handling
///
/// This module maps corpus directory names to source language codes and
/// validates, normalizes and matches ISO 639-1 / ISO 639-3 codes.
/// Language code type
#[derive(Debug, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-3 (3-letter) code
    Part3,
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-3 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();

    match normalized_code.len() {
        2 if Language::from_639_1(&normalized_code).is_some() => Ok(LanguageCodeType::Part1),
        3 if Language::from_639_3(&normalized_code).is_some() => Ok(LanguageCodeType::Part3),
        _ => Err(anyhow!("Invalid language code: {}", code)),
    }
}

/// Normalize a language code to ISO 639-3 (3-letter) format
pub fn normalize_to_part3(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 && Language::from_639_3(&normalized_code).is_some() {
        return Ok(normalized_code);
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes represent the same language.
///
/// Codes that are not ISO codes (such as `auto`) only match themselves.
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part3(code1), normalize_to_part3(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => code1.trim().eq_ignore_ascii_case(code2.trim()),
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part3(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Name of the directory directly containing `path`
pub fn parent_directory_name(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|parent| parent.file_name())
        .map(|name| name.to_string_lossy().to_string())
}

/// Resolve the source language of a file from its containing directory.
///
/// Returns the directory name alongside the code so callers can report
/// unknown directories.
pub fn source_language_for_path<'a>(
    path: &Path,
    directories: &'a BTreeMap<String, String>,
) -> (Option<String>, Option<&'a str>) {
    let directory = parent_directory_name(path);
    let code = directory.as_deref().and_then(|name| {
        let name = name.trim().to_lowercase();
        directories
            .get(&name)
            .or_else(|| {
                directories
                    .iter()
                    .find(|(key, _)| key.trim().to_lowercase() == name)
                    .map(|(_, code)| code)
            })
            .map(String::as_str)
    });
    (directory, code)
}
