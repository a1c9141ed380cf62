//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::app::services::holding_store::SqliteHoldingStore;
use crate::app::services::text_extractor::PlainTextExtractor;
use crate::config::Config;
use crate::constants::TEXT_EXTENSIONS;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Statistics reported by every command
#[derive(Debug, Clone, Default)]
pub struct CommandStats {
    /// Number of statement files ingested successfully
    pub files_processed: usize,
    /// Number of statement files that failed
    pub files_failed: usize,
    /// Number of holding records written or listed
    pub records: usize,
    /// Number of rows skipped while parsing
    pub rows_skipped: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

impl CommandStats {
    /// Calculate the file success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let total = self.files_processed + self.files_failed;
        if total == 0 {
            0.0
        } else {
            (self.files_processed as f64 / total as f64) * 100.0
        }
    }
}

/// Set up structured logging on stderr
///
/// `RUST_LOG` takes precedence over `log_level`.
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("depot_ingest={}", log_level)));

    let installed = if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    installed.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using the layered approach (defaults -> file -> env -> args)
pub fn load_configuration(
    config_file: Option<&Path>,
    database: Option<&PathBuf>,
    workers: Option<usize>,
) -> Result<Config> {
    let mut config = Config::load(config_file)?;

    if let Some(database) = database {
        config = config.with_database_path(database);
    }
    if let Some(workers) = workers {
        config = config.with_max_concurrent_files(workers);
    }

    config.validate()?;
    Ok(config)
}

/// Open the configured SQLite database, creating its directory if needed
pub fn open_store(config: &Config) -> Result<SqliteHoldingStore> {
    let path = &config.storage.database_path;

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::io(
                format!("Failed to create database directory {}", parent.display()),
                e,
            )
        })?;
    }

    SqliteHoldingStore::open(path)
}

/// Expand files and directories into the statement files to ingest
///
/// Explicit files are kept whatever their extension, so that unsupported
/// documents are reported instead of silently ignored. Directories are walked
/// recursively for text and markdown files.
pub fn discover_statement_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }

        if !path.is_dir() {
            return Err(Error::configuration(format!(
                "Input path does not exist: {}",
                path.display()
            )));
        }

        for entry in WalkDir::new(path).follow_links(false) {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to walk {}", path.display()), e)
            })?;

            let candidate = entry.path();
            if candidate.is_file() && has_text_extension(candidate) {
                files.push(candidate.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();

    info!("Discovered {} statement files", files.len());
    for file in &files {
        debug!("  Found: {}", file.display());
    }

    Ok(files)
}

fn has_text_extension(path: &Path) -> bool {
    path.extension().is_some()
        && path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(PlainTextExtractor::accepts)
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Quote a CSV field when needed
pub fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// File extensions picked up when walking directories, for help output
pub fn statement_extensions() -> String {
    TEXT_EXTENSIONS.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_command_stats_success_rate() {
        let stats = CommandStats::default();
        assert_eq!(stats.success_rate(), 0.0);

        let stats = CommandStats {
            files_processed: 3,
            files_failed: 1,
            ..Default::default()
        };
        assert_eq!(stats.success_rate(), 75.0);
    }

    #[test]
    fn test_discover_statement_files() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("2024").join("q4");
        fs::create_dir_all(&nested).unwrap();

        fs::write(temp_dir.path().join("a.md"), "").unwrap();
        fs::write(nested.join("b.TXT"), "").unwrap();
        fs::write(nested.join("c.pdf"), "").unwrap();
        fs::write(nested.join("README"), "").unwrap();

        let explicit_pdf = nested.join("c.pdf");
        let files = discover_statement_files(&[
            temp_dir.path().to_path_buf(),
            explicit_pdf.clone(),
            temp_dir.path().join("a.md"),
        ])
        .unwrap();

        assert_eq!(files.len(), 3);
        assert!(files.contains(&temp_dir.path().join("a.md")));
        assert!(files.contains(&nested.join("b.TXT")));
        assert!(files.contains(&explicit_pdf));
    }

    #[test]
    fn test_discover_missing_path() {
        let result = discover_statement_files(&[PathBuf::from("/nonexistent/statements")]);
        assert!(matches!(result, Err(Error::Configuration { .. })));
    }

    #[test]
    fn test_load_configuration_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[ingest]\nmax_concurrent_files = 2\n").unwrap();

        let database = temp_dir.path().join("cli.sqlite");
        let config = load_configuration(Some(&config_path), Some(&database), Some(7)).unwrap();

        assert_eq!(config.storage.database_path, database);
        assert_eq!(config.ingest.max_concurrent_files, 7);
    }

    #[test]
    fn test_cli_workers_repair_invalid_file_value() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, "[ingest]\nmax_concurrent_files = 0\n").unwrap();

        let config = load_configuration(Some(&config_path), None, Some(4)).unwrap();
        assert_eq!(config.ingest.max_concurrent_files, 4);

        assert!(load_configuration(Some(&config_path), None, None).is_err());
    }

    #[test]
    fn test_open_store_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::default().with_database_path(temp_dir.path().join("data").join("h.sqlite"));

        let store = open_store(&config).unwrap();
        assert!(store.path().is_some_and(|path| path.exists()));
    }

    #[test]
    fn test_csv_escape() {
        assert_eq!(csv_escape("Tesla Inc."), "Tesla Inc.");
        assert_eq!(csv_escape("Bond 1,5% 2030"), "\"Bond 1,5% 2030\"");
        assert_eq!(csv_escape("Say \"hi\""), "\"Say \"\"hi\"\"\"");
    }
}
