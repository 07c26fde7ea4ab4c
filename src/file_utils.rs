use anyhow::{Result, anyhow};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::app_config::DiscoveryConfig;

// @module: Corpus discovery and directory utilities

/// Which files count as translation inputs
#[derive(Debug, Clone)]
pub struct DiscoveryOptions {
    /// Extension without the leading dot, matched case-insensitively
    pub extension: String,
    /// Case-insensitive substring marking transient checkpoint files
    pub checkpoint_marker: String,
    /// Follow symbolic links while walking
    pub follow_links: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self::from(&DiscoveryConfig::default())
    }
}

impl From<&DiscoveryConfig> for DiscoveryOptions {
    fn from(config: &DiscoveryConfig) -> Self {
        Self {
            extension: config.extension.trim_start_matches('.').to_lowercase(),
            checkpoint_marker: config.checkpoint_marker.to_lowercase(),
            follow_links: config.follow_links,
        }
    }
}

/// Lazy walk over the eligible files under a root, in file name order.
///
/// Entries that cannot be read (permission errors, vanished files, link
/// loops) are logged and skipped so one bad entry never hides the rest.
pub struct TabularFiles {
    entries: walkdir::IntoIter,
    options: DiscoveryOptions,
}

impl Iterator for TabularFiles {
    type Item = PathBuf;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.entries.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if FileManager::is_checkpoint_name(&name, &self.options) {
                debug!("Skipping checkpoint file: {}", name);
                continue;
            }
            if FileManager::has_extension(&name, &self.options) {
                return Some(entry.into_path());
            }
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Start a lazy, restartable walk over the eligible files under `root`
    pub fn discover<P: AsRef<Path>>(root: P, options: &DiscoveryOptions) -> TabularFiles {
        let entries = WalkDir::new(root.as_ref())
            .follow_links(options.follow_links)
            .sort_by_file_name()
            .into_iter();

        TabularFiles {
            entries,
            options: options.clone(),
        }
    }

    /// Collect every eligible file under `root`, which must be a directory
    pub fn find_tabular_files<P: AsRef<Path>>(root: P, options: &DiscoveryOptions) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        if !Self::dir_exists(root) {
            return Err(anyhow!("Root directory does not exist: {}", root.display()));
        }
        Ok(Self::discover(root, options).collect())
    }

    /// Whether a file name qualifies as a translation input
    pub fn is_eligible_file_name(name: &str, options: &DiscoveryOptions) -> bool {
        Self::has_extension(name, options) && !Self::is_checkpoint_name(name, options)
    }

    fn has_extension(name: &str, options: &DiscoveryOptions) -> bool {
        name.to_lowercase().ends_with(&format!(".{}", options.extension))
    }

    fn is_checkpoint_name(name: &str, options: &DiscoveryOptions) -> bool {
        !options.checkpoint_marker.is_empty() && name.to_lowercase().contains(&options.checkpoint_marker)
    }
}
