use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::app_config::{ColumnPair, ColumnRename, Config};
use crate::language_utils;
use crate::providers::Provider;
use crate::table::Table;
use crate::translation::{AttemptEngine, AttemptResult, EngineOptions};

// @module: Row selection and in-place column translation for one file

/// What happened to one column pair of a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnReport {
    pub source: String,
    pub target: String,
    /// Rows that needed translation
    pub candidates: usize,
    /// Rows that received a translation
    pub translated: usize,
    /// Rows that received a verbatim copy of the source
    pub fallbacks: usize,
}

/// Result of processing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// The file was processed and saved
    Translated {
        source_language: String,
        columns: Vec<ColumnReport>,
    },
    /// The file was left untouched
    Skipped { reason: String },
}

impl FileOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, FileOutcome::Skipped { .. })
    }

    /// Rows written across all column pairs
    pub fn rows_written(&self) -> usize {
        match self {
            FileOutcome::Translated { columns, .. } => columns.iter().map(|c| c.candidates).sum(),
            FileOutcome::Skipped { .. } => 0,
        }
    }
}

/// Translates configured columns of tabular files in place
#[derive(Debug, Clone)]
pub struct ColumnTranslator {
    engine_options: EngineOptions,
    column_renames: Vec<ColumnRename>,
    language_directories: BTreeMap<String, String>,
    null_markers: Vec<String>,
    progress: Option<MultiProgress>,
}

impl ColumnTranslator {
    pub fn from_config(config: &Config) -> Self {
        Self {
            engine_options: EngineOptions::from_config(config),
            column_renames: config.column_renames.clone(),
            language_directories: config.language_directories.clone(),
            null_markers: config.translation.null_markers.clone(),
            progress: None,
        }
    }

    /// Draw per-column progress bars on `progress`
    pub fn with_progress(mut self, progress: MultiProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Blank cells and null markers (as written by dataframe tools) count as null
    pub fn is_null(&self, value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty() || self.null_markers.iter().any(|marker| marker == trimmed)
    }

    /// Rows whose target is null and whose source is not, in row order
    pub fn candidate_rows(&self, table: &Table, source_column: usize, target_column: usize) -> Vec<usize> {
        (0..table.row_count())
            .filter(|&row| {
                self.is_null(table.cell(row, target_column)) && !self.is_null(table.cell(row, source_column))
            })
            .collect()
    }

    /// Translate every configured column pair of the file at `path` and save it in place.
    ///
    /// Files in a directory that does not name a known language are skipped
    /// without being written.
    pub async fn translate_columns<P: Provider + ?Sized>(
        &self,
        path: &Path,
        provider: &P,
        column_pairs: &[ColumnPair],
    ) -> Result<FileOutcome> {
        let mut table = Self::load_table(path).await?;

        for rename in &self.column_renames {
            if table.rename_column(&rename.from, &rename.to) {
                info!("Column renamed: {} → {}", rename.from, rename.to);
            }
        }

        let (directory, source_language) =
            language_utils::source_language_for_path(path, &self.language_directories);
        let Some(source_language) = source_language.map(String::from) else {
            let reason = format!("Unknown language '{}'", directory.unwrap_or_default());
            warn!("Skipping {}: {}", path.display(), reason);
            return Ok(FileOutcome::Skipped { reason });
        };

        let language_name = language_utils::get_language_name(&source_language)
            .unwrap_or_else(|_| source_language.clone());
        info!("Processing file: {} | Source language: {}", path.display(), language_name);

        let engine = AttemptEngine::new(provider, &self.engine_options);
        let mut columns = Vec::with_capacity(column_pairs.len());

        for pair in column_pairs {
            let Some(source_column) = table.column_index(&pair.source) else {
                warn!("Skipping column {} in {}: Column not found.", pair.source, path.display());
                continue;
            };
            let target_column = table.ensure_column(&pair.target);

            let candidates = self.candidate_rows(&table, source_column, target_column);
            let mut report = ColumnReport {
                source: pair.source.clone(),
                target: pair.target.clone(),
                candidates: candidates.len(),
                translated: 0,
                fallbacks: 0,
            };

            if candidates.is_empty() {
                info!("No rows need translation in column '{}'.", pair.source);
                columns.push(report);
                continue;
            }

            info!("Translating {} rows for column '{}'...", candidates.len(), pair.source);
            let progress_bar = self.progress_bar(path, &pair.source, candidates.len());

            for row in candidates {
                let original = table.cell(row, source_column).to_string();
                let value = match engine.translate(&original, &source_language).await {
                    // a value that reads back as null would be selected again on every run
                    AttemptResult::Translated(text) if !self.is_null(&text) => {
                        report.translated += 1;
                        text
                    }
                    _ => {
                        report.fallbacks += 1;
                        original
                    }
                };
                table.set_cell(row, target_column, value);

                if let Some(bar) = &progress_bar {
                    bar.inc(1);
                }
            }

            if let Some(bar) = progress_bar {
                bar.finish_and_clear();
            }
            if report.fallbacks > 0 {
                warn!(
                    "{} of {} rows in '{}' kept their original text",
                    report.fallbacks, report.candidates, pair.source
                );
            }
            columns.push(report);
        }

        Self::save_table(table).await?;
        info!("File saved: {}", path.display());

        Ok(FileOutcome::Translated {
            source_language,
            columns,
        })
    }

    async fn load_table(path: &Path) -> Result<Table> {
        let owned = path.to_path_buf();
        tokio::task::spawn_blocking(move || Table::load(owned))
            .await
            .context("CSV reader task failed")?
            .with_context(|| format!("Failed to load {}", path.display()))
    }

    async fn save_table(table: Table) -> Result<()> {
        let path = table.path().to_path_buf();
        tokio::task::spawn_blocking(move || table.save())
            .await
            .context("CSV writer task failed")?
            .with_context(|| format!("Failed to save {}", path.display()))
    }

    fn progress_bar(&self, path: &Path, column: &str, length: usize) -> Option<ProgressBar> {
        let progress = self.progress.as_ref()?;
        let bar = progress.add(ProgressBar::new(length as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len} rows {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        bar.set_message(format!("{} {}", file_name, column));
        Some(bar)
    }
}
