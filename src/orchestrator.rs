/*!
 * Parallel job orchestration over a file corpus.
 *
 * Every discovered file becomes one job. Jobs run as independent tokio tasks,
 * at most `workers` at a time, each building its own provider through the
 * factory. A job that errors or panics is reported as `Err` and never
 * affects its siblings.
 */

use anyhow::{Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::MultiProgress;
use log::{error, info};
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::column_translator::{ColumnTranslator, FileOutcome};
use crate::file_utils::{DiscoveryOptions, FileManager};
use crate::providers::Provider;

/// One file to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationJob {
    /// Position in discovery order
    pub index: usize,
    pub path: PathBuf,
}

/// Final state of a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Ok,
    Err(String),
}

/// Status of one finished job
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job: TranslationJob,
    pub status: JobStatus,
    /// Present when the job succeeded
    pub outcome: Option<FileOutcome>,
}

impl JobReport {
    pub fn is_error(&self) -> bool {
        matches!(self.status, JobStatus::Err(_))
    }

    pub fn is_skipped(&self) -> bool {
        self.outcome.as_ref().is_some_and(FileOutcome::is_skipped)
    }

    /// `OK   <path>` or `ERR  <path>` followed by the error detail
    pub fn status_line(&self) -> String {
        match &self.status {
            JobStatus::Ok => format!("OK   {}", self.job.path.display()),
            JobStatus::Err(detail) => format!("ERR  {}\n{}", self.job.path.display(), detail),
        }
    }
}

/// Aggregate result of a run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub discovered: usize,
    pub processed: usize,
    pub errors: usize,
    pub skipped: usize,
    /// Reports in completion order
    pub reports: Vec<JobReport>,
}

impl RunSummary {
    pub fn summary_line(&self) -> String {
        format!("Finished. Files processed: {}, errors: {}", self.processed, self.errors)
    }
}

/// Distributes per-file translation jobs over a bounded set of tasks
pub struct Orchestrator<F> {
    config: Arc<Config>,
    factory: Arc<F>,
    progress: Option<MultiProgress>,
}

impl<F, P> Orchestrator<F>
where
    F: Fn() -> Result<P> + Send + Sync + 'static,
    P: Provider + 'static,
{
    /// Create an orchestrator; `factory` builds a fresh provider for every job
    pub fn new(config: Config, factory: F) -> Self {
        Self {
            config: Arc::new(config),
            factory: Arc::new(factory),
            progress: None,
        }
    }

    /// Draw per-file progress bars on `progress`
    pub fn with_progress(mut self, progress: MultiProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Discover the files under `root`, truncated to the configured limit
    pub fn discover_jobs(&self, root: &Path) -> Result<Vec<TranslationJob>> {
        let options = DiscoveryOptions::from(&self.config.discovery);
        let mut files = FileManager::find_tabular_files(root, &options)?;
        if self.config.limit > 0 {
            files.truncate(self.config.limit);
        }

        Ok(files
            .into_iter()
            .enumerate()
            .map(|(index, path)| TranslationJob { index, path })
            .collect())
    }

    /// Discover and process every file under `root`
    pub async fn run(&self, root: &Path, on_report: impl FnMut(&JobReport)) -> Result<RunSummary> {
        let jobs = self
            .discover_jobs(root)
            .with_context(|| format!("Failed to discover files under {}", root.display()))?;

        if jobs.is_empty() {
            info!("No {} files found under: {}", self.config.discovery.extension, root.display());
            return Ok(RunSummary::default());
        }

        Ok(self.run_jobs(jobs, on_report).await)
    }

    /// Process `jobs`, reporting each one as it completes
    pub async fn run_jobs(&self, jobs: Vec<TranslationJob>, mut on_report: impl FnMut(&JobReport)) -> RunSummary {
        let workers = self.config.effective_workers().max(1);
        let max_error_chars = self.config.max_error_chars;
        let mut summary = RunSummary {
            discovered: jobs.len(),
            ..RunSummary::default()
        };

        info!("Discovered {} files. Running with {} workers.", jobs.len(), workers);

        let mut translator = ColumnTranslator::from_config(&self.config);
        if self.config.translation.show_progress {
            if let Some(progress) = &self.progress {
                translator = translator.with_progress(progress.clone());
            }
        }
        let translator = Arc::new(translator);

        let mut results = stream::iter(jobs)
            .map(|job| {
                let factory = Arc::clone(&self.factory);
                let translator = Arc::clone(&translator);
                let config = Arc::clone(&self.config);
                let path = job.path.clone();

                async move {
                    let handle = tokio::spawn(async move {
                        let provider = (*factory)().context("Failed to create translation client")?;
                        translator
                            .translate_columns(&path, &provider, &config.column_pairs)
                            .await
                    });
                    (job, handle.await)
                }
            })
            .buffer_unordered(workers);

        while let Some((job, joined)) = results.next().await {
            let report = match joined {
                Ok(Ok(outcome)) => JobReport {
                    job,
                    status: JobStatus::Ok,
                    outcome: Some(outcome),
                },
                Ok(Err(e)) => JobReport {
                    job,
                    status: JobStatus::Err(truncate_message(&format!("{:#}", e), max_error_chars)),
                    outcome: None,
                },
                Err(join_error) => {
                    let detail = if join_error.is_panic() {
                        format!("worker panicked: {}", panic_message(join_error.into_panic()))
                    } else {
                        join_error.to_string()
                    };
                    JobReport {
                        job,
                        status: JobStatus::Err(truncate_message(&detail, max_error_chars)),
                        outcome: None,
                    }
                }
            };

            if let JobStatus::Err(detail) = &report.status {
                error!("Job failed for {}: {}", report.job.path.display(), detail);
                summary.errors += 1;
            }
            if report.is_skipped() {
                summary.skipped += 1;
            }
            summary.processed += 1;

            on_report(&report);
            summary.reports.push(report);
        }

        summary
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Keep at most `max_chars` characters, marking the cut with an ellipsis
pub fn truncate_message(message: &str, max_chars: usize) -> String {
    if message.chars().count() <= max_chars {
        return message.to_string();
    }
    let mut truncated: String = message.chars().take(max_chars).collect();
    truncated.push('…');
    truncated
}
