//! Command-line argument definitions for depot ingestion
//!
//! This module defines the complete CLI interface using the clap derive API.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the depot statement ingester
#[derive(Debug, Clone, Parser)]
#[command(
    name = "depot-ingest",
    version,
    about = "Ingest broker portfolio statements into a holdings database",
    long_about = "Parses portfolio statements that were already converted to plain text or \
                  markdown, in either the markdown table layout or the older line-oriented \
                  layout, and replaces the stored holdings of each statement's depot."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Ingest statement files or directories of statements
    Ingest(IngestArgs),
    /// Show the stored holdings of one depot
    Show(ShowArgs),
}

/// Arguments for the ingest command
#[derive(Debug, Clone, Parser)]
pub struct IngestArgs {
    /// Statement files or directories
    ///
    /// Directories are searched recursively for .txt, .md and .markdown files.
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// SQLite database to write to
    ///
    /// Overrides `storage.database_path` and the DEPOT_INGEST_DATABASE variable.
    #[arg(
        short = 'd',
        long = "database",
        value_name = "FILE",
        help = "SQLite database to write to"
    )]
    pub database: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/depot-ingest/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of statements ingested concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of statements ingested concurrently"
    )]
    pub workers: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,

    /// Output format for the ingestion report
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Arguments for the show command
#[derive(Debug, Clone, Parser)]
pub struct ShowArgs {
    /// Depot identifier as printed after `**Depot:**`
    #[arg(value_name = "DEPOT")]
    pub depot: String,

    /// SQLite database to read from
    #[arg(
        short = 'd',
        long = "database",
        value_name = "FILE",
        help = "SQLite database to read from"
    )]
    pub database: Option<PathBuf>,

    /// Path to configuration file
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Output format for the holdings listing
    #[arg(
        long = "output-format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Result<Commands> {
        self.command
            .clone()
            .ok_or_else(|| Error::configuration("No command given, see --help"))
    }
}

/// Map verbosity flags to a log level
///
/// Without `-v` or `-q` the configured level applies.
fn log_level(verbose: u8, quiet: bool, configured: &str) -> String {
    if quiet {
        return "error".to_string();
    }

    match verbose {
        0 => configured.to_lowercase(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

impl IngestArgs {
    /// Validate the ingest command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }

            if workers > 64 {
                return Err(Error::configuration("Number of workers cannot exceed 64"));
            }
        }

        for path in &self.paths {
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    path.display()
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self, configured: &str) -> String {
        log_level(self.verbose, self.quiet, configured)
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

impl ShowArgs {
    /// Validate the show command arguments
    pub fn validate(&self) -> Result<()> {
        if let Some(config_file) = &self.config_file {
            if !config_file.is_file() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self, configured: &str) -> String {
        log_level(self.verbose, false, configured)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn ingest_args(paths: Vec<PathBuf>) -> IngestArgs {
        IngestArgs {
            paths,
            database: None,
            config_file: None,
            workers: None,
            verbose: 0,
            quiet: false,
            output_format: OutputFormat::Human,
        }
    }

    #[test]
    fn test_parse_ingest_command() {
        let args = Args::try_parse_from([
            "depot-ingest",
            "ingest",
            "a.md",
            "statements/",
            "--database",
            "db.sqlite",
            "-j",
            "2",
            "-vv",
            "--output-format",
            "json",
        ])
        .unwrap();

        match args.get_command().unwrap() {
            Commands::Ingest(ingest) => {
                assert_eq!(ingest.paths.len(), 2);
                assert_eq!(ingest.database, Some(PathBuf::from("db.sqlite")));
                assert_eq!(ingest.workers, Some(2));
                assert_eq!(ingest.verbose, 2);
                assert_eq!(ingest.output_format, OutputFormat::Json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_show_command() {
        let args = Args::try_parse_from(["depot-ingest", "show", "UPLOAD001", "--output-format", "csv"])
            .unwrap();

        match args.get_command().unwrap() {
            Commands::Show(show) => {
                assert_eq!(show.depot, "UPLOAD001");
                assert_eq!(show.output_format, OutputFormat::Csv);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ingest_requires_paths() {
        assert!(Args::try_parse_from(["depot-ingest", "ingest"]).is_err());
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Args::try_parse_from(["depot-ingest", "ingest", "a.md", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_missing_command() {
        let args = Args::try_parse_from(["depot-ingest"]).unwrap();
        assert!(args.get_command().is_err());
    }

    #[test]
    fn test_ingest_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let args = ingest_args(vec![temp_dir.path().to_path_buf()]);
        assert!(args.validate().is_ok());

        let mut invalid_args = args.clone();
        invalid_args.workers = Some(0);
        assert!(invalid_args.validate().is_err());

        invalid_args.workers = Some(65);
        assert!(invalid_args.validate().is_err());

        let mut invalid_args = args.clone();
        invalid_args.paths = vec![PathBuf::from("/nonexistent/statement.md")];
        assert!(invalid_args.validate().is_err());

        let mut invalid_args = args;
        invalid_args.config_file = Some(temp_dir.path().join("missing.toml"));
        assert!(invalid_args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = ingest_args(vec![PathBuf::from("a.md")]);

        assert_eq!(args.get_log_level("warn"), "warn");
        assert_eq!(args.get_log_level("INFO"), "info");

        args.verbose = 1;
        assert_eq!(args.get_log_level("warn"), "info");

        args.verbose = 2;
        assert_eq!(args.get_log_level("warn"), "debug");

        args.verbose = 3;
        assert_eq!(args.get_log_level("warn"), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level("warn"), "error");
    }

    #[test]
    fn test_show_progress() {
        let mut args = ingest_args(vec![PathBuf::from("a.md")]);
        assert!(args.show_progress());

        args.output_format = OutputFormat::Json;
        assert!(!args.show_progress());

        args.output_format = OutputFormat::Human;
        args.quiet = true;
        assert!(!args.show_progress());
    }
}
