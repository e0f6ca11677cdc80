// DRCScope - app/ingest.rs
//
// Ingestion pipeline: read -> strict UTF-8 decode -> parse, one report at a
// time, with failures isolated to the report that caused them.
//
// Architecture:
//   - Reports are parsed on rayon workers. Each report is independent, and
//     the indexed parallel collect returns results in input order, so record
//     order matches line order within a file and file order matches the
//     argument order.
//   - A read or decode failure never touches other reports. The batch either
//     skips the report with a warning (default) or aborts (strict mode).

use crate::core::aggregate::ParsedReport;
use crate::core::discovery::DiscoveredReport;
use crate::core::parser;
use crate::platform::fs;
use crate::util::error::IngestError;
use rayon::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Raw report content paired with the identifier its records will carry.
#[derive(Debug, Clone)]
pub struct ReportSource {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Configuration for an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestConfig {
    /// Worker threads for parsing (0 = rayon's global pool).
    pub worker_threads: usize,
    /// Abort the batch on the first failed report instead of skipping it.
    pub strict: bool,
    /// Identify reports by full path rather than file name.
    pub full_paths: bool,
}

/// Everything an ingestion run produced.
#[derive(Debug, Default)]
pub struct IngestOutcome {
    /// Successfully parsed reports, in input order.
    pub reports: Vec<ParsedReport>,
    /// Reports that were skipped, in input order.
    pub failures: Vec<IngestError>,
    /// Total lines scanned across all parsed reports.
    pub lines_processed: u64,
    /// Non-fatal notices about the batch itself, e.g. renamed blocks.
    pub warnings: Vec<String>,
}

impl IngestOutcome {
    /// Number of records across all parsed reports.
    pub fn record_count(&self) -> usize {
        self.reports.iter().map(|r| r.records.len()).sum()
    }
}

/// Decode and parse one in-memory report.
pub fn ingest_source(source: ReportSource) -> Result<(ParsedReport, u64), IngestError> {
    let ReportSource { name, bytes } = source;
    let content = String::from_utf8(bytes).map_err(|e| IngestError::InvalidEncoding {
        source_file: name.clone(),
        source: e,
    })?;

    let result = parser::parse_content(&content, &name);
    Ok((
        ParsedReport {
            source_file: name,
            records: result.records,
        },
        result.lines_processed,
    ))
}

/// Ingest in-memory reports, e.g. uploads received by an embedding service.
pub fn ingest_sources(
    sources: Vec<ReportSource>,
    config: &IngestConfig,
) -> Result<IngestOutcome, IngestError> {
    let results = parallel_map(sources, config.worker_threads, ingest_source);
    collect_outcome(results, config.strict)
}

/// Read, decode, and parse report files found by discovery.
pub fn ingest_files(
    files: &[DiscoveredReport],
    config: &IngestConfig,
) -> Result<IngestOutcome, IngestError> {
    let (names, warnings) = block_names(files, config.full_paths);
    let jobs: Vec<(DiscoveredReport, String)> = files.iter().cloned().zip(names).collect();

    let results = parallel_map(jobs, config.worker_threads, |(file, name)| {
        let bytes = fs::read_bytes(&file.path).map_err(|e| IngestError::Io {
            file: file.path.clone(),
            source: e,
        })?;
        ingest_source(ReportSource { name, bytes })
    });

    let mut outcome = collect_outcome(results, config.strict)?;
    outcome.warnings = warnings;
    Ok(outcome)
}

/// Pick the block identifier for every file.
///
/// Bare file names are used unless `full_paths` is set. When one bare name
/// belongs to more than one distinct path, those reports keep their full
/// path instead so separate blocks never merge, and a warning says so.
fn block_names(files: &[DiscoveredReport], full_paths: bool) -> (Vec<String>, Vec<String>) {
    if full_paths {
        let names = files
            .iter()
            .map(|f| fs::display_name(&f.path, true))
            .collect();
        return (names, Vec::new());
    }

    let mut paths_by_name: BTreeMap<String, BTreeSet<&Path>> = BTreeMap::new();
    for file in files {
        paths_by_name
            .entry(fs::display_name(&file.path, false))
            .or_default()
            .insert(file.path.as_path());
    }

    let mut warnings = Vec::new();
    for (name, paths) in &paths_by_name {
        if paths.len() > 1 {
            tracing::warn!(
                name = %name,
                reports = paths.len(),
                "File name shared by several reports; using full paths"
            );
            warnings.push(format!(
                "'{name}' names {} different reports; they are listed by full path.",
                paths.len()
            ));
        }
    }

    let names = files
        .iter()
        .map(|f| {
            let bare = fs::display_name(&f.path, false);
            let shared = paths_by_name.get(&bare).is_some_and(|p| p.len() > 1);
            if shared {
                fs::display_name(&f.path, true)
            } else {
                bare
            }
        })
        .collect();
    (names, warnings)
}

/// Fold per-report results into an outcome, honouring strict mode.
fn collect_outcome(
    results: Vec<Result<(ParsedReport, u64), IngestError>>,
    strict: bool,
) -> Result<IngestOutcome, IngestError> {
    let mut outcome = IngestOutcome::default();

    for result in results {
        match result {
            Ok((report, lines)) => {
                outcome.lines_processed += lines;
                outcome.reports.push(report);
            }
            Err(e) if strict => {
                tracing::error!(file = %e.file_label(), error = %e, "Report failed; aborting batch");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(file = %e.file_label(), error = %e, "Report skipped");
                outcome.failures.push(e);
            }
        }
    }

    tracing::info!(
        reports = outcome.reports.len(),
        skipped = outcome.failures.len(),
        records = outcome.record_count(),
        lines = outcome.lines_processed,
        "Ingestion complete"
    );

    Ok(outcome)
}

/// Map `f` over `items` on rayon, preserving input order.
///
/// `worker_threads == 0` uses the global pool. If a dedicated pool cannot be
/// built the work runs sequentially on the calling thread.
fn parallel_map<T, R, F>(items: Vec<T>, worker_threads: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    if worker_threads == 0 {
        return items.into_par_iter().map(f).collect();
    }

    match rayon::ThreadPoolBuilder::new()
        .num_threads(worker_threads)
        .build()
    {
        Ok(pool) => pool.install(|| items.into_par_iter().map(f).collect()),
        Err(e) => {
            tracing::warn!(
                worker_threads,
                error = %e,
                "Could not build parser thread pool; parsing sequentially"
            );
            items.into_iter().map(f).collect()
        }
    }
}
