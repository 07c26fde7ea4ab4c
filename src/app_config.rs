use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use url::Url;

use crate::errors::AppError;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Root directory scanned for tabular files
    #[serde(default = "default_root_dir")]
    pub root_dir: PathBuf,

    /// Number of files translated concurrently (0 = host parallelism)
    #[serde(default)]
    pub workers: usize,

    /// Only process the first N discovered files (0 = all)
    #[serde(default)]
    pub limit: usize,

    /// Target language code (ISO)
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Ordered (source column, target column) pairs
    #[serde(default = "default_column_pairs")]
    pub column_pairs: Vec<ColumnPair>,

    /// Legacy column names renamed on load when the current name is absent
    #[serde(default = "default_column_renames")]
    pub column_renames: Vec<ColumnRename>,

    /// Directory name (lowercase) to source language code
    #[serde(default = "default_language_directories")]
    pub language_directories: BTreeMap<String, String>,

    /// Corpus discovery settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Translation engine settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Translation service client settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Longest error detail kept in a job status line
    #[serde(default = "default_max_error_chars")]
    pub max_error_chars: usize,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// One source to target column mapping
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ColumnPair {
    pub source: String,
    pub target: String,
}

impl ColumnPair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

/// Compatibility rename applied when loading a file
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ColumnRename {
    pub from: String,
    pub to: String,
}

/// Settings for finding input files
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DiscoveryConfig {
    /// File extension of tabular files, matched case-insensitively
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Files whose name contains this marker (case-insensitive) are never inputs
    #[serde(default = "default_checkpoint_marker")]
    pub checkpoint_marker: String,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_links: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            checkpoint_marker: default_checkpoint_marker(),
            follow_links: false,
        }
    }
}

/// Translation engine settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Attempts per stage
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff unit in milliseconds, multiplied by the attempt number
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Source language used when the declared one fails
    #[serde(default = "default_fallback_source_language")]
    pub fallback_source_language: String,

    /// How many times a text may be halved by sentence splitting
    #[serde(default = "default_max_split_depth")]
    pub max_split_depth: u32,

    /// Cell values treated as null in addition to blank cells
    #[serde(default = "default_null_markers")]
    pub null_markers: Vec<String>,

    /// Show per-column progress bars
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            fallback_source_language: default_fallback_source_language(),
            max_split_depth: default_max_split_depth(),
            null_markers: default_null_markers(),
            show_progress: true,
        }
    }
}

/// Google web translation client settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Service URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Client identifier sent with each request
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent header
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            client_id: default_client_id(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_root_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_column_pairs() -> Vec<ColumnPair> {
    vec![
        ColumnPair::new("initial_response", "gtrans_initial_response"),
        ColumnPair::new("final_response", "gtrans_final_response"),
    ]
}

fn default_column_renames() -> Vec<ColumnRename> {
    vec![ColumnRename {
        from: "trans_response".to_string(),
        to: "response".to_string(),
    }]
}

fn default_language_directories() -> BTreeMap<String, String> {
    [
        ("hindi", "hi"),
        ("bengali", "bn"),
        ("telugu", "te"),
        ("marathi", "mr"),
        ("english", "en"),
    ]
    .into_iter()
    .map(|(name, code)| (name.to_string(), code.to_string()))
    .collect()
}

fn default_extension() -> String {
    "csv".to_string()
}

fn default_checkpoint_marker() -> String {
    "checkpoint".to_string()
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    1500 // 1.5s, 3s, ... between attempts
}

fn default_fallback_source_language() -> String {
    "en".to_string()
}

fn default_max_split_depth() -> u32 {
    1
}

fn default_null_markers() -> Vec<String> {
    ["nan", "NaN", "null", "NULL", "None"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_endpoint() -> String {
    "https://translate.googleapis.com/translate_a/single".to_string()
}

fn default_client_id() -> String {
    "gtx".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("tabtrans/{}", env!("CARGO_PKG_VERSION"))
}

fn default_max_error_chars() -> usize {
    500
}

fn default_true() -> bool {
    true
}

/// Host parallelism, or 4 when it cannot be determined
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Load the configuration if it exists, otherwise write and return the default one
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load(path);
        }

        log::warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        config.save(path)?;
        Ok(config)
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize config to JSON")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config to file: {}", path.display()))
    }

    /// Effective worker count, resolving 0 to host parallelism
    pub fn effective_workers(&self) -> usize {
        if self.workers == 0 {
            default_workers()
        } else {
            self.workers
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), AppError> {
        if self.column_pairs.is_empty() {
            return Err(AppError::Config("At least one column pair is required".to_string()));
        }
        for pair in &self.column_pairs {
            if pair.source.trim().is_empty() || pair.target.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "Column pair has an empty name: {:?}",
                    pair
                )));
            }
            if pair.source == pair.target {
                return Err(AppError::Config(format!(
                    "Column pair translates '{}' onto itself",
                    pair.source
                )));
            }
        }

        if self.translation.max_retries == 0 {
            return Err(AppError::Config("max_retries must be at least 1".to_string()));
        }

        if self.discovery.extension.trim_start_matches('.').is_empty() {
            return Err(AppError::Config("Discovery extension must not be empty".to_string()));
        }

        // Validate languages
        crate::language_utils::get_language_name(&self.target_language)
            .map_err(|e| AppError::Config(e.to_string()))?;
        crate::language_utils::get_language_name(&self.translation.fallback_source_language)
            .map_err(|e| AppError::Config(e.to_string()))?;
        for (directory, code) in &self.language_directories {
            crate::language_utils::get_language_name(code).map_err(|e| {
                AppError::Config(format!("Directory '{}' maps to {}", directory, e))
            })?;
        }

        Url::parse(&self.provider.endpoint).map_err(|e| {
            AppError::Config(format!("Invalid endpoint '{}': {}", self.provider.endpoint, e))
        })?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            root_dir: default_root_dir(),
            workers: 0,
            limit: 0,
            target_language: default_target_language(),
            column_pairs: default_column_pairs(),
            column_renames: default_column_renames(),
            language_directories: default_language_directories(),
            discovery: DiscoveryConfig::default(),
            translation: TranslationConfig::default(),
            provider: ProviderConfig::default(),
            max_error_chars: default_max_error_chars(),
            log_level: LogLevel::default(),
        }
    }
}
