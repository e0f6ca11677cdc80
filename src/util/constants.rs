// DRCScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "DRCScope";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "DRCScope";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the configuration file inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default log level when neither RUST_LOG, --debug, nor config set one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Block status thresholds
// =============================================================================

/// Block totals at or above this value are FAIL. Totals between 1 and this
/// value (exclusive) are WARNING; exactly 0 is CLEAN.
pub const FAIL_THRESHOLD: u64 = 5;

// =============================================================================
// Discovery limits
// =============================================================================

/// Maximum directory recursion depth during discovery.
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Hard upper bound on max depth (prevents runaway traversal).
pub const ABSOLUTE_MAX_DEPTH: usize = 50;

/// Minimum sensible value for the max-files limit.
pub const MIN_MAX_FILES: usize = 1;

/// Maximum number of report files collected from directory arguments.
pub const DEFAULT_MAX_FILES: usize = 1_000;

/// Hard upper bound on max files (prevents configuration mistakes).
pub const ABSOLUTE_MAX_FILES: usize = 50_000;

/// Filename globs that identify DRC report files inside a directory.
/// Explicit file arguments bypass these.
pub const DEFAULT_INCLUDE_PATTERNS: &[&str] = &["*.rpt", "*.summary"];

/// Directory and filename globs that are never descended into or ingested.
pub const DEFAULT_EXCLUDE_PATTERNS: &[&str] = &[".git", "*.gz", "*.bak"];

// =============================================================================
// Parsing
// =============================================================================

/// Default number of worker threads for parallel parsing.
/// 0 means auto-detect (use available CPU cores).
pub const DEFAULT_WORKER_THREADS: usize = 0;

/// Upper bound on the configurable worker thread count.
pub const MAX_WORKER_THREADS: usize = 256;

// =============================================================================
// Export
// =============================================================================

/// Column header of the flat record CSV. Order and spelling are part of the
/// export format consumed by downstream spreadsheets.
pub const CSV_HEADER: [&str; 5] = ["layer", "rule", "count", "filename", "Category"];

// =============================================================================
// Rendering
// =============================================================================

/// Width in characters of the longest bar in the category chart.
pub const CHART_BAR_WIDTH: usize = 40;
