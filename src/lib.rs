/*!
 * # tabtrans - resilient translation of CSV corpora
 *
 * Translates free-text columns of many CSV files into English through a
 * remote translation service, safe to re-run and parallel across files.
 *
 * ## Features
 *
 * - Retry, source-language fallback and sentence-split recovery per text
 * - Idempotent row selection: only rows with an empty target are translated
 * - One isolated job per file with completion-order status reporting
 * - Source language derived from the containing directory name
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `file_utils`: Corpus discovery
 * - `table`: In-memory CSV tables
 * - `translation`: The attempt engine and sentence segmentation
 * - `column_translator`: Row selection and in-place column translation
 * - `orchestrator`: Parallel per-file jobs
 * - `language_utils`: Directory and ISO language code utilities
 * - `providers`: Clients for the remote translation service
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod column_translator;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod orchestrator;
pub mod providers;
pub mod table;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::{ColumnPair, Config};
pub use column_translator::{ColumnReport, ColumnTranslator, FileOutcome};
pub use errors::{AppError, ProviderError, TableError};
pub use orchestrator::{JobReport, JobStatus, Orchestrator, RunSummary, TranslationJob};
pub use translation::{AttemptEngine, AttemptResult, EngineOptions};
