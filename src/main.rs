// DRCScope - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Configuration loading and logging initialisation
// 3. Discovery, ingestion, aggregation
// 4. Rendering to stdout and optional CSV/JSON export

use clap::Parser;
use drcscope::app::ingest::{self, IngestConfig};
use drcscope::app::state::AppState;
use drcscope::core::discovery;
use drcscope::core::export;
use drcscope::core::model::Readiness;
use drcscope::platform::config::{self, AppConfig, OutputFormat, PlatformPaths};
use drcscope::ui::report;
use drcscope::util::{self, constants};
use drcscope::util::error::{DrcError, ExportError};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Exit code for a completed run (readiness not enforced, or READY).
const EXIT_SUCCESS: i32 = 0;
/// Exit code when `--check` is set and the verdict is ACTION REQUIRED.
const EXIT_ACTION_REQUIRED: i32 = 1;
/// Exit code for configuration, discovery, export, or strict ingest failures.
const EXIT_ERROR: i32 = 2;

/// DRCScope - DRC report aggregator and tape-out readiness summary.
///
/// Reads design-rule-check summary reports, classifies every rule result,
/// and rolls counts up per block and per category.
#[derive(Parser, Debug)]
#[command(name = "drcscope", version, about)]
struct Cli {
    /// Report files or directories to scan for reports.
    paths: Vec<PathBuf>,

    /// Configuration file (default: platform config directory).
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Output format written to stdout.
    #[arg(short = 'f', long = "format", value_enum)]
    format: Option<OutputFormat>,

    /// Write the flat record list as CSV to this file.
    #[arg(long = "export-csv")]
    export_csv: Option<PathBuf>,

    /// Write the full dashboard as JSON to this file.
    #[arg(long = "export-json")]
    export_json: Option<PathBuf>,

    /// Identify blocks by full path instead of file name.
    #[arg(long = "full-paths")]
    full_paths: bool,

    /// Abort on the first unreadable or non-UTF-8 report instead of skipping it.
    #[arg(long = "strict")]
    strict: bool,

    /// Exit with status 1 unless the verdict is READY.
    #[arg(long = "check")]
    check: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();
    std::process::exit(match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Run failed");
            eprintln!("Error: {e}");
            EXIT_ERROR
        }
    });
}

fn run(cli: &Cli) -> util::error::Result<i32> {
    // Config is read before logging exists, so its warnings are replayed
    // once the subscriber is installed.
    let (config, config_warnings) = load_config(cli.config.as_deref())?;
    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = constants::APP_VERSION,
        debug = cli.debug,
        paths = cli.paths.len(),
        "DRCScope starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Configuration warning");
    }

    let mut state = AppState::new(cli.debug);
    state.warnings.extend(config_warnings);

    if !cli.paths.is_empty() {
        let (files, discovery_warnings) =
            discovery::discover_reports(&cli.paths, &config.discovery())?;
        state.warnings.extend(discovery_warnings);

        let ingest_config = IngestConfig {
            worker_threads: config.worker_threads,
            strict: cli.strict,
            full_paths: cli.full_paths || config.full_paths,
        };
        let outcome = ingest::ingest_files(&files, &ingest_config)?;
        state.load(outcome);
    }

    tracing::info!(status = %state.status_message, "Run complete");

    write_exports(cli, &state)?;

    let format = cli.format.unwrap_or(config.format);
    write_stdout(&state, format)?;

    let code = match state.verdict() {
        Some(Readiness::ActionRequired) if cli.check => EXIT_ACTION_REQUIRED,
        _ => EXIT_SUCCESS,
    };
    Ok(code)
}

/// Explicit `--config` must load; the platform default may be absent.
fn load_config(explicit: Option<&Path>) -> util::error::Result<(AppConfig, Vec<String>)> {
    let result = match explicit {
        Some(path) => config::load_config(path, true),
        None => config::load_config(&PlatformPaths::resolve().config_file(), false),
    };
    Ok(result?)
}

fn write_exports(cli: &Cli, state: &AppState) -> util::error::Result<()> {
    let records = state
        .dashboard()
        .map(|d| d.records.as_slice())
        .unwrap_or(&[]);

    if let Some(ref path) = cli.export_csv {
        let file = create_file(path)?;
        let count = export::export_csv(records, file, path)?;
        tracing::info!(path = %path.display(), records = count, "CSV exported");
    }

    if let Some(ref path) = cli.export_json {
        match state.dashboard() {
            Some(dashboard) => {
                let file = create_file(path)?;
                export::export_json(dashboard, file, path, chrono::Utc::now())?;
                tracing::info!(path = %path.display(), "JSON exported");
            }
            None => tracing::warn!(
                path = %path.display(),
                "No violations to export; JSON file not written"
            ),
        }
    }
    Ok(())
}

fn write_stdout(state: &AppState, format: OutputFormat) -> util::error::Result<()> {
    let stdout_path = PathBuf::from("<stdout>");
    let mut stdout = std::io::stdout().lock();

    match (format, state.dashboard()) {
        (OutputFormat::Json, Some(dashboard)) => {
            export::export_json(dashboard, &mut stdout, &stdout_path, chrono::Utc::now())?;
            writeln!(stdout).map_err(|e| stdout_error(&stdout_path, e))?;
        }
        (OutputFormat::Json, None) => {
            // Keep stdout parseable for scripts even without results.
            let body = serde_json::json!({
                "tool": constants::APP_NAME,
                "version": constants::APP_VERSION,
                "status": state.status_message,
                "verdict": state.verdict().map(|v| v.label()),
                "warnings": state.warnings,
            });
            writeln!(stdout, "{body:#}").map_err(|e| stdout_error(&stdout_path, e))?;
        }
        (OutputFormat::Text, _) => {
            stdout
                .write_all(report::render_text(state).as_bytes())
                .map_err(|e| stdout_error(&stdout_path, e))?;
        }
    }
    Ok(())
}

fn create_file(path: &Path) -> Result<std::fs::File, ExportError> {
    std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn stdout_error(path: &Path, source: std::io::Error) -> DrcError {
    DrcError::Io {
        path: path.to_path_buf(),
        operation: "write",
        source,
    }
}
