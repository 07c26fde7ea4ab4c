// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info};
use std::io::Write;
use std::path::PathBuf;

use tabtrans::app_config::{self, Config};
use tabtrans::file_utils::FileManager;
use tabtrans::orchestrator::Orchestrator;
use tabtrans::providers::google::GoogleTranslate;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate the CSV files under a root directory (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for tabtrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Root directory to scan for CSV files
    #[arg(value_name = "ROOT")]
    root: Option<PathBuf>,

    /// Number of files translated in parallel (default: host parallelism)
    #[arg(short, long)]
    workers: Option<usize>,

    /// Process only the first N files (0 = all)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Hide progress bars
    #[arg(long)]
    no_progress: bool,
}

/// tabtrans - translate free-text CSV columns into English
///
/// Walks a corpus of per-language directories and fills the configured
/// target columns in place. Re-running only translates rows still empty.
#[derive(Parser, Debug)]
#[command(name = "tabtrans")]
#[command(version)]
#[command(about = "Resilient parallel translation of CSV corpora")]
#[command(long_about = "tabtrans translates configured text columns of CSV files into English.

EXAMPLES:
    tabtrans ./responses                      # Translate every CSV under ./responses
    tabtrans -w 8 ./responses                 # Use 8 parallel jobs
    tabtrans -n 3 ./responses                 # Only the first 3 files (for testing)
    tabtrans --log-level debug ./responses    # Verbose logging
    tabtrans completions bash > tabtrans.bash # Generate bash completions

LAYOUT:
    Files must live in a directory named after their language
    (hindi, bengali, telugu, marathi, english). Files whose name contains
    'checkpoint' are ignored.

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    translate: TranslateArgs,
}

// @struct: Custom logger implementation
//
// Lines are written while the progress bars are suspended so they never tear them.
struct CustomLogger {
    level: LevelFilter,
    progress: MultiProgress,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter, progress: MultiProgress) -> Self {
        CustomLogger { level, progress }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter, progress: MultiProgress) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level, progress));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Colored, timestamped log line
    fn format_line(record: &Record) -> String {
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        format!(
            "\x1B[{}m{} {:<5} {}\x1B[0m",
            Self::color_for_level(record.level()),
            now,
            record.level(),
            record.args()
        )
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level.min(log::max_level())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = Self::format_line(record);
            self.progress.suspend(|| {
                let _ = writeln!(std::io::stderr(), "{}", line);
            });
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let multi_progress = MultiProgress::new();

    // Accept everything here; the effective level is applied through max_level
    CustomLogger::init(LevelFilter::Trace, multi_progress.clone())?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "tabtrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args, multi_progress).await,
        None => run_translate(cli.translate, multi_progress).await,
    }
}

async fn run_translate(options: TranslateArgs, multi_progress: MultiProgress) -> Result<()> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&options.config_path)?;

    // Override config with CLI options if provided
    if let Some(root) = options.root {
        config.root_dir = root;
    }
    if let Some(workers) = options.workers {
        config.workers = workers;
    }
    if let Some(limit) = options.limit {
        config.limit = limit;
    }
    if let Some(level) = options.log_level {
        config.log_level = level.into();
    }
    if options.no_progress {
        config.translation.show_progress = false;
    }

    config.validate()?;
    log::set_max_level(config.log_level.to_level_filter());

    let root = config.root_dir.clone();
    if !FileManager::dir_exists(&root) {
        return Err(anyhow!("Root directory does not exist: {}", root.display()));
    }

    let provider_config = config.provider.clone();
    let show_progress = config.translation.show_progress;
    let orchestrator = Orchestrator::new(config, move || {
        GoogleTranslate::new(&provider_config).map_err(anyhow::Error::from)
    })
    .with_progress(multi_progress.clone());

    let jobs = orchestrator.discover_jobs(&root)?;
    if jobs.is_empty() {
        println!("No CSV files found under: {}", root.display());
        return Ok(());
    }
    println!(
        "Discovered {} CSVs. Running with {} workers.",
        jobs.len(),
        orchestrator.config().effective_workers()
    );

    let files_bar = if show_progress {
        let bar = multi_progress.add(ProgressBar::new(jobs.len() as u64));
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {eta}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style);
        Some(bar)
    } else {
        None
    };

    let summary = orchestrator
        .run_jobs(jobs, |report| {
            multi_progress.suspend(|| println!("{}", report.status_line()));
            if let Some(bar) = &files_bar {
                bar.inc(1);
            }
        })
        .await;

    if let Some(bar) = files_bar {
        bar.finish_and_clear();
    }

    if summary.skipped > 0 {
        info!("{} files skipped (unknown language directory)", summary.skipped);
    }
    println!("\n{}", summary.summary_line());

    Ok(())
}
