/*!
 * Tests for error types and conversions
 */

use tabtrans::errors::{AppError, ProviderError, TableError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 429,
        message: "Too many requests".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("429"));
    assert!(display.contains("Too many requests"));
}

#[test]
fn test_providerError_rateLimitExceeded_shouldDisplayCorrectly() {
    let error = ProviderError::RateLimitExceeded("hi -> en".to_string());
    assert!(error.to_string().contains("Rate limit exceeded"));
}

#[test]
fn test_tableError_missingColumn_shouldNameColumn() {
    let error = TableError::MissingColumn("final_response".to_string());
    assert_eq!(error.to_string(), "Column not found: final_response");
}

#[test]
fn test_appError_config_shouldDisplayReason() {
    let error = AppError::Config("max_retries must be at least 1".to_string());
    assert_eq!(
        error.to_string(),
        "Configuration error: max_retries must be at least 1"
    );
}

#[test]
fn test_tableError_wideRow_shouldDescribeMismatch() {
    let error = TableError::WideRow {
        path: "hindi/a.csv".to_string(),
        line: 3,
        found: 4,
        expected: 2,
    };
    assert_eq!(
        error.to_string(),
        "Row 3 of hindi/a.csv has 4 fields but the header has 2"
    );
}
