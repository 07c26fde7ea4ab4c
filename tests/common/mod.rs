/*!
 * Common test utilities for the tabtrans test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use tabtrans::app_config::{ColumnPair, Config};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file at `relative_path` under `dir`, creating parent directories
pub fn create_test_file(dir: &Path, relative_path: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative_path);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a sample Hindi response file with the default columns
pub fn create_response_csv(dir: &Path, relative_path: &str) -> Result<PathBuf> {
    let content = "id,initial_response,final_response\n\
                   1,नमस्ते दुनिया,अंतिम उत्तर\n\
                   2,,खाली नहीं\n\
                   3,दूसरा,\n";
    create_test_file(dir, relative_path, content)
}

/// Configuration with no backoff delays and no progress bars
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.translation.retry_backoff_ms = 0;
    config.translation.show_progress = false;
    config.workers = 2;
    config
}

/// Configuration translating a single `text` column into `text_en`
pub fn single_column_config() -> Config {
    let mut config = test_config();
    config.column_pairs = vec![ColumnPair::new("text", "text_en")];
    config
}

/// Initialize test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
