/*!
 * Error types for the tabtrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to the translation service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The service answered but returned no text
    #[error("Empty translation returned")]
    EmptyResponse,
}

/// Errors that can occur while reading or writing a tabular file
#[derive(Error, Debug)]
pub enum TableError {
    /// Underlying file system error
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV content
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    /// A data row has more fields than the header
    #[error("Row {line} of {path} has {found} fields but the header has {expected}")]
    WideRow {
        path: String,
        line: usize,
        found: usize,
        expected: usize,
    },

    /// Column lookup failed
    #[error("Column not found: {0}")]
    MissingColumn(String),
}

/// Application-level errors raised before any file is processed
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}
