// DRCScope - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::discovery::DiscoveryConfig;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for DRCScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/drcscope/ or %APPDATA%\DRCScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to the current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Default location of config.toml.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[discovery]` section.
    pub discovery: DiscoverySection,
    /// `[parsing]` section.
    pub parsing: ParsingSection,
    /// `[output]` section.
    pub output: OutputSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[discovery]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DiscoverySection {
    /// Maximum directory recursion depth.
    pub max_depth: Option<usize>,
    /// Maximum report files collected per directory argument.
    pub max_files: Option<usize>,
    /// Include glob patterns.
    pub include_patterns: Option<Vec<String>>,
    /// Exclude glob patterns.
    pub exclude_patterns: Option<Vec<String>>,
}

/// `[parsing]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ParsingSection {
    /// Number of worker threads (0 = auto).
    pub worker_threads: Option<usize>,
}

/// `[output]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// "text" or "json".
    pub format: Option<String>,
    /// Identify blocks by full path instead of file name.
    pub full_paths: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable tables and chart.
    #[default]
    Text,
    /// The full dashboard as JSON.
    Json,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Discovery --
    pub max_depth: usize,
    pub max_files: usize,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,

    // -- Parsing --
    /// Worker threads for per-file parsing (0 = auto).
    pub worker_threads: usize,

    // -- Output --
    pub format: OutputFormat,
    pub full_paths: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let discovery = DiscoveryConfig::default();
        Self {
            max_depth: discovery.max_depth,
            max_files: discovery.max_files,
            include_patterns: discovery.include_patterns,
            exclude_patterns: discovery.exclude_patterns,
            worker_threads: constants::DEFAULT_WORKER_THREADS,
            format: OutputFormat::default(),
            full_paths: false,
            log_level: None,
        }
    }
}

impl AppConfig {
    /// Discovery settings carried by this configuration.
    pub fn discovery(&self) -> DiscoveryConfig {
        DiscoveryConfig {
            max_depth: self.max_depth,
            max_files: self.max_files,
            include_patterns: self.include_patterns.clone(),
            exclude_patterns: self.exclude_patterns.clone(),
        }
    }
}

/// Load and validate `config.toml` at `config_path`.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
///
/// When `explicit` is false (the platform default location), a missing file
/// yields defaults with no warnings, and an unreadable or malformed file
/// yields defaults plus a warning. When the user named the file explicitly,
/// all three are errors.
pub fn load_config(
    config_path: &Path,
    explicit: bool,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let mut warnings: Vec<String> = Vec::new();

    if !explicit && !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return Ok((AppConfig::default(), warnings));
    }

    let parsed = std::fs::read_to_string(config_path)
        .map_err(|e| ConfigError::Io {
            path: config_path.to_path_buf(),
            source: e,
        })
        .and_then(|content| {
            toml::from_str::<RawConfig>(&content).map_err(|e| ConfigError::TomlParse {
                path: config_path.to_path_buf(),
                source: e,
            })
        });

    let raw = match parsed {
        Ok(raw) => raw,
        Err(e) if explicit => return Err(e),
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return Ok((AppConfig::default(), warnings));
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let config = validate(raw, &mut warnings);

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    Ok((config, warnings))
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();
    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(format!(
            "{}. Using default.",
            ConfigError::ValueOutOfRange {
                field: field.to_string(),
                value,
                expected,
            }
        ));
    };

    // -- Discovery: max_depth --
    if let Some(depth) = raw.discovery.max_depth {
        if (1..=constants::ABSOLUTE_MAX_DEPTH).contains(&depth) {
            config.max_depth = depth;
        } else {
            out_of_range(
                "discovery.max_depth",
                depth.to_string(),
                format!("1-{}", constants::ABSOLUTE_MAX_DEPTH),
            );
        }
    }

    // -- Discovery: max_files --
    if let Some(files) = raw.discovery.max_files {
        if (constants::MIN_MAX_FILES..=constants::ABSOLUTE_MAX_FILES).contains(&files) {
            config.max_files = files;
        } else {
            out_of_range(
                "discovery.max_files",
                files.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_MAX_FILES,
                    constants::ABSOLUTE_MAX_FILES
                ),
            );
        }
    }

    // -- Discovery: patterns --
    if let Some(patterns) = raw.discovery.include_patterns {
        config.include_patterns = patterns;
    }
    if let Some(patterns) = raw.discovery.exclude_patterns {
        config.exclude_patterns = patterns;
    }

    // -- Parsing: worker_threads --
    if let Some(threads) = raw.parsing.worker_threads {
        if threads <= constants::MAX_WORKER_THREADS {
            config.worker_threads = threads;
        } else {
            out_of_range(
                "parsing.worker_threads",
                threads.to_string(),
                format!("0-{} (0 = auto)", constants::MAX_WORKER_THREADS),
            );
        }
    }

    // -- Output: format --
    if let Some(ref format) = raw.output.format {
        match format.to_lowercase().as_str() {
            "text" => config.format = OutputFormat::Text,
            "json" => config.format = OutputFormat::Json,
            _ => out_of_range(
                "output.format",
                format.clone(),
                "\"text\" or \"json\"".to_string(),
            ),
        }
    }

    if let Some(full_paths) = raw.output.full_paths {
        config.full_paths = full_paths;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug, trace".to_string(),
            );
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(content: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn test_missing_default_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(&dir.path().join("config.toml"), false).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.max_depth, constants::DEFAULT_MAX_DEPTH);
        assert_eq!(config.format, OutputFormat::Text);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(&dir.path().join("nope.toml"), true);
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_valid_config_applied() {
        let (_dir, path) = write_config(
            r#"
            [discovery]
            max_depth = 3
            include_patterns = ["*.drc"]

            [parsing]
            worker_threads = 4

            [output]
            format = "JSON"
            full_paths = true

            [logging]
            level = "Debug"
            "#,
        );
        let (config, warnings) = load_config(&path, true).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.include_patterns, vec!["*.drc".to_string()]);
        assert_eq!(config.worker_threads, 4);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.full_paths);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.discovery().max_depth, 3);
    }

    #[test]
    fn test_out_of_range_values_warn_and_default() {
        let (_dir, path) = write_config(
            r#"
            [discovery]
            max_depth = 0
            max_files = 0

            [output]
            format = "xml"

            [logging]
            level = "loud"
            "#,
        );
        let (config, warnings) = load_config(&path, true).unwrap();
        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("discovery.max_depth"));
        assert_eq!(config.max_depth, constants::DEFAULT_MAX_DEPTH);
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_malformed_default_config_warns() {
        let (_dir, path) = write_config("[discovery\nmax_depth = ");
        let (config, warnings) = load_config(&path, false).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(config.max_files, constants::DEFAULT_MAX_FILES);
    }

    #[test]
    fn test_malformed_explicit_config_is_error() {
        let (_dir, path) = write_config("[discovery\nmax_depth = ");
        assert!(matches!(
            load_config(&path, true),
            Err(ConfigError::TomlParse { .. })
        ));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (_dir, path) = write_config("[future]\nsetting = 1\n");
        let (_, warnings) = load_config(&path, true).unwrap();
        assert!(warnings.is_empty());
    }
}
