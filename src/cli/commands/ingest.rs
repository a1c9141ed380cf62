//! Ingest command implementation
//!
//! Ingests every discovered statement file into the configured database.
//! Files are parsed on the blocking thread pool, at most
//! `ingest.max_concurrent_files` at a time.

use crate::app::models::IngestSummary;
use crate::app::services::ingestion::Ingestor;
use crate::cli::args::{IngestArgs, OutputFormat};
use crate::cli::commands::shared::{
    CommandStats, create_progress_bar, csv_escape, discover_statement_files, load_configuration,
    open_store, setup_logging, statement_extensions,
};
use crate::{Error, Result};
use colored::*;
use futures::stream::{self, StreamExt};
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::task;
use tracing::{error, info, warn};

/// Result of ingesting one file
#[derive(Debug)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub result: Result<IngestSummary>,
}

/// Run the ingest command
pub async fn run_ingest(args: IngestArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(
        args.config_file.as_deref(),
        args.database.as_ref(),
        args.workers,
    )?;
    setup_logging(&args.get_log_level(&config.logging.level), args.quiet)?;

    let files = discover_statement_files(&args.paths)?;
    if files.is_empty() {
        return Err(Error::configuration(format!(
            "No statement files ({}) found in the given paths",
            statement_extensions()
        )));
    }

    let store = open_store(&config)?;
    let ingestor = Arc::new(Ingestor::new(Arc::new(store)));

    let progress_bar = args
        .show_progress()
        .then(|| create_progress_bar(files.len() as u64, "Ingesting statements..."));

    let outcomes = ingest_files(
        ingestor,
        files,
        config.ingest.max_concurrent_files,
        progress_bar.clone(),
    )
    .await;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    warn_on_shared_depots(&outcomes);

    let mut stats = CommandStats::default();
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => {
                stats.files_processed += 1;
                stats.records += summary.record_count;
                stats.rows_skipped += summary.skipped_row_count;
            }
            Err(e) => {
                stats.files_failed += 1;
                error!("Failed to ingest {}: {}", outcome.path.display(), e);
            }
        }
    }
    stats.processing_time = start_time.elapsed();

    generate_ingest_report(args.output_format, &outcomes, &stats)?;

    info!(
        "Ingestion completed in {:.2}s",
        stats.processing_time.as_secs_f64()
    );

    if stats.files_failed > 0 {
        return Err(Error::data_validation(format!(
            "{} of {} statement files could not be ingested",
            stats.files_failed,
            outcomes.len()
        )));
    }

    Ok(stats)
}

/// Ingest files concurrently; outcomes are returned sorted by path
pub async fn ingest_files(
    ingestor: Arc<Ingestor>,
    files: Vec<PathBuf>,
    max_concurrent_files: usize,
    progress_bar: Option<ProgressBar>,
) -> Vec<FileOutcome> {
    info!(
        "Ingesting {} files with up to {} in parallel",
        files.len(),
        max_concurrent_files
    );

    let mut outcomes = stream::iter(files)
        .map(|path| {
            let ingestor = Arc::clone(&ingestor);
            let progress_bar = progress_bar.clone();
            async move {
                let task_path = path.clone();
                let result = task::spawn_blocking(move || ingestor.ingest_path(&task_path))
                    .await
                    .unwrap_or_else(|e| {
                        Err(Error::processing_interrupted(format!(
                            "Ingestion task for {} failed: {}",
                            path.display(),
                            e
                        )))
                    });

                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }

                FileOutcome { path, result }
            }
        })
        .buffer_unordered(max_concurrent_files.max(1))
        .collect::<Vec<_>>()
        .await;

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    outcomes
}

/// Warn when one batch holds several statements of the same depot
///
/// Each of them replaces the depot's holdings, so only one survives.
fn warn_on_shared_depots(outcomes: &[FileOutcome]) {
    let mut by_depot: HashMap<&str, Vec<&PathBuf>> = HashMap::new();
    for outcome in outcomes {
        if let Ok(summary) = &outcome.result {
            by_depot
                .entry(summary.depot_id.as_str())
                .or_default()
                .push(&outcome.path);
        }
    }

    for (depot_id, paths) in by_depot.into_iter().filter(|(_, paths)| paths.len() > 1) {
        warn!(
            "{} statements in this batch belong to depot '{}'; only one of them is kept",
            paths.len(),
            depot_id
        );
    }
}

/// Generate ingestion report based on output format
fn generate_ingest_report(
    format: OutputFormat,
    outcomes: &[FileOutcome],
    stats: &CommandStats,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            print!("{}", human_ingest_report(outcomes, stats));
            Ok(())
        }
        OutputFormat::Json => {
            println!("{}", json_ingest_report(outcomes, stats)?);
            Ok(())
        }
        OutputFormat::Csv => {
            print!("{}", csv_ingest_report(outcomes));
            Ok(())
        }
    }
}

fn human_ingest_report(outcomes: &[FileOutcome], stats: &CommandStats) -> String {
    let mut output = format!("\n{}\n", "Ingestion Summary".bright_green().bold());

    for outcome in outcomes {
        match &outcome.result {
            Ok(summary) => {
                let depot = if summary.depot_id.is_empty() {
                    "<no depot>".yellow().to_string()
                } else {
                    summary.depot_id.bright_white().bold().to_string()
                };
                output.push_str(&format!(
                    "  {} {} -> depot {}: {} records ({} format)",
                    "✓".bright_green(),
                    outcome.path.display(),
                    depot,
                    summary.record_count,
                    summary.format
                ));
                if summary.skipped_row_count > 0 {
                    output.push_str(&format!(
                        ", {} rows skipped",
                        summary.skipped_row_count.to_string().yellow()
                    ));
                }
                output.push('\n');
            }
            Err(e) => {
                output.push_str(&format!(
                    "  {} {}: {}\n",
                    "✗".bright_red(),
                    outcome.path.display(),
                    e
                ));
            }
        }
    }

    output.push_str(&format!(
        "\n  Files: {} ingested, {} failed ({:.1}%)\n  Records stored: {}\n  Rows skipped: {}\n  Time: {:.2}s\n",
        stats.files_processed.to_string().bright_white().bold(),
        if stats.files_failed > 0 {
            stats.files_failed.to_string().bright_red().bold()
        } else {
            stats.files_failed.to_string().normal()
        },
        stats.success_rate(),
        stats.records,
        stats.rows_skipped,
        stats.processing_time.as_secs_f64()
    ));

    output
}

fn json_ingest_report(outcomes: &[FileOutcome], stats: &CommandStats) -> Result<String> {
    use serde_json::json;

    let files: Vec<_> = outcomes
        .iter()
        .map(|outcome| match &outcome.result {
            Ok(summary) => json!({
                "path": outcome.path,
                "status": "ingested",
                "depot_id": summary.depot_id,
                "format": summary.format,
                "record_count": summary.record_count,
                "skipped_row_count": summary.skipped_row_count,
            }),
            Err(e) => json!({
                "path": outcome.path,
                "status": "failed",
                "error": e.to_string(),
            }),
        })
        .collect();

    let report = json!({
        "summary": {
            "files_processed": stats.files_processed,
            "files_failed": stats.files_failed,
            "records": stats.records,
            "rows_skipped": stats.rows_skipped,
            "processing_seconds": stats.processing_time.as_secs_f64(),
        },
        "files": files,
    });

    serde_json::to_string_pretty(&report)
        .map_err(|e| Error::data_validation(format!("Failed to serialize ingestion report: {}", e)))
}

fn csv_ingest_report(outcomes: &[FileOutcome]) -> String {
    let mut csv = String::from("path,status,depot_id,format,record_count,skipped_row_count,error\n");

    for outcome in outcomes {
        let path = csv_escape(&outcome.path.display().to_string());
        match &outcome.result {
            Ok(summary) => csv.push_str(&format!(
                "{},ingested,{},{},{},{},\n",
                path,
                csv_escape(&summary.depot_id),
                summary.format,
                summary.record_count,
                summary.skipped_row_count
            )),
            Err(e) => csv.push_str(&format!(
                "{},failed,,,,,{}\n",
                path,
                csv_escape(&e.to_string())
            )),
        }
    }

    csv
}
