// DRCScope - core/discovery.rs
//
// Expands path arguments into the list of report files to ingest.
//
// Explicit file arguments are taken as-is, whatever their extension.
// Directory arguments are walked recursively and filtered by filename
// globs. Only metadata is read here; file contents belong to app::ingest.
//
// Per-entry I/O errors during a walk are non-fatal and come back as warnings.
// A path argument that does not exist is fatal.

use crate::util::constants;
use crate::util::error::DiscoveryError;
use std::path::{Path, PathBuf};

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for a discovery operation.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Maximum directory recursion depth.
    pub max_depth: usize,

    /// Maximum number of files collected from directory arguments.
    pub max_files: usize,

    /// Filename globs a file inside a directory MUST match to be included.
    /// An empty list means "include everything that is not excluded".
    pub include_patterns: Vec<String>,

    /// Globs matched against filenames AND directory names. Matching files
    /// are skipped; matching directories are not descended into.
    pub exclude_patterns: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: constants::DEFAULT_MAX_DEPTH,
            max_files: constants::DEFAULT_MAX_FILES,
            include_patterns: constants::DEFAULT_INCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            exclude_patterns: constants::DEFAULT_EXCLUDE_PATTERNS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

/// A report file selected for ingestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredReport {
    /// Full path to the file.
    pub path: PathBuf,

    /// File size in bytes.
    pub size: u64,
}

// =============================================================================
// Discovery
// =============================================================================

/// Resolve `paths` into report files.
///
/// Output order: path arguments in the order given; files found under a
/// directory argument are sorted by path so runs are reproducible.
///
/// # Fatal errors
/// Returns `Err` if a path argument does not exist or cannot be accessed.
pub fn discover_reports(
    paths: &[PathBuf],
    config: &DiscoveryConfig,
) -> Result<(Vec<DiscoveredReport>, Vec<String>), DiscoveryError> {
    let max_files = config.max_files.min(constants::ABSOLUTE_MAX_FILES);
    let max_depth = config.max_depth.min(constants::ABSOLUTE_MAX_DEPTH);

    let include_pats = compile_patterns(&config.include_patterns, "include");
    let exclude_pats = compile_patterns(&config.exclude_patterns, "exclude");

    let mut reports: Vec<DiscoveredReport> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for root in paths {
        let metadata = std::fs::metadata(root).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => DiscoveryError::PermissionDenied {
                path: root.clone(),
                source: e,
            },
            _ => DiscoveryError::RootNotFound { path: root.clone() },
        })?;

        if metadata.is_dir() {
            let mut found = walk_directory(
                root,
                max_depth,
                &include_pats,
                &exclude_pats,
                &mut warnings,
            );
            found.sort_by(|a, b| a.path.cmp(&b.path));

            if found.len() > max_files {
                warnings.push(format!(
                    "'{}' contains {} report files but the limit is {max_files}. \
                     Only the first {max_files} (by path) were loaded. \
                     Raise [discovery] max_files in config if you need more.",
                    root.display(),
                    found.len()
                ));
                tracing::info!(
                    root = %root.display(),
                    found = found.len(),
                    limit = max_files,
                    "Report list truncated"
                );
                found.truncate(max_files);
            }

            reports.extend(found);
        } else {
            reports.push(DiscoveredReport {
                path: root.clone(),
                size: metadata.len(),
            });
        }
    }

    tracing::debug!(
        arguments = paths.len(),
        reports = reports.len(),
        warnings = warnings.len(),
        "Discovery complete"
    );

    Ok((reports, warnings))
}

/// Walk one directory argument, collecting files that pass the glob filters.
fn walk_directory(
    root: &Path,
    max_depth: usize,
    include_pats: &[glob::Pattern],
    exclude_pats: &[glob::Pattern],
    warnings: &mut Vec<String>,
) -> Vec<DiscoveredReport> {
    tracing::debug!(
        root = %root.display(),
        max_depth,
        "Walking directory"
    );

    let walker = walkdir::WalkDir::new(root)
        .max_depth(max_depth)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.file_type().is_dir() && e.depth() > 0 {
                let name = e.file_name().to_str().unwrap_or("");
                return !matches_any(name, exclude_pats);
            }
            true
        });

    let mut found = Vec::new();
    for entry_result in walker {
        let entry = match entry_result {
            Ok(e) => e,
            Err(e) => {
                let path_str = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "<unknown>".to_string());
                let msg = format!("Cannot access '{path_str}': {e}");
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let file_name = match path.file_name().and_then(|n| n.to_str()) {
            Some(n) => n,
            None => {
                warnings.push(format!("Skipping '{}': non-UTF-8 filename", path.display()));
                continue;
            }
        };

        if matches_any(file_name, exclude_pats) {
            tracing::trace!(file = file_name, "Excluded by pattern");
            continue;
        }
        if !include_pats.is_empty() && !matches_any(file_name, include_pats) {
            tracing::trace!(file = file_name, "Not matched by include patterns");
            continue;
        }

        let size = match entry.metadata() {
            Ok(m) => m.len(),
            Err(e) => {
                let msg = format!("Cannot read metadata for '{}': {e}", path.display());
                tracing::debug!(warning = %msg, "Discovery warning");
                warnings.push(msg);
                continue;
            }
        };

        found.push(DiscoveredReport {
            path: path.to_path_buf(),
            size,
        });
    }
    found
}

// =============================================================================
// Glob helpers
// =============================================================================

/// Compile glob pattern strings. Patterns that fail to compile are logged
/// and skipped.
fn compile_patterns(patterns: &[String], kind: &str) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|p| match glob::Pattern::new(p) {
            Ok(compiled) => Some(compiled),
            Err(e) => {
                tracing::warn!(pattern = p, kind, error = %e, "Invalid glob pattern, skipping");
                None
            }
        })
        .collect()
}

fn matches_any(name: &str, patterns: &[glob::Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(name))
}
