// HerdImport - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::model::ImportMode;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for HerdImport configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/herdimport/ or %APPDATA%\HerdImport\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
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
    /// `[import]` section.
    pub import: ImportSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[import]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ImportSection {
    /// Mode used when the CLI does not name one: "excel", "csv" or "manual".
    pub default_mode: Option<String>,
    /// Two-digit year look-ahead window.
    pub century_window_years: Option<u32>,
    /// Maximum data lines per batch.
    pub max_lines: Option<usize>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Indent JSON exports.
    pub pretty_json: Option<bool>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Import --
    pub default_mode: ImportMode,
    pub century_window_years: u32,
    pub max_lines: usize,

    // -- Export --
    pub pretty_json: bool,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_mode: ImportMode::default(),
            century_window_years: constants::DEFAULT_CENTURY_WINDOW_YEARS,
            max_lines: constants::DEFAULT_MAX_IMPORT_LINES,
            pretty_json: true,
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate a config file.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file gives defaults with no warnings (first run). An unreadable
/// or unparseable file gives defaults plus a warning; the import still runs.
pub fn load_config(config_path: &Path) -> (AppConfig, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), warnings);
    }

    let raw = match read_raw_config(config_path) {
        Ok(r) => r,
        Err(e) => {
            let msg = format!("{e}. Using defaults.");
            tracing::warn!("{}", msg);
            warnings.push(msg);
            return (AppConfig::default(), warnings);
        }
    };

    tracing::info!(path = %config_path.display(), "Loaded config.toml");

    let (config, errors) = validate_config(raw);
    warnings.extend(errors.iter().map(ToString::to_string));

    if !warnings.is_empty() {
        tracing::warn!(
            count = warnings.len(),
            "Config validation produced warnings"
        );
    }

    (config, warnings)
}

/// Read and deserialise a config file without validating values.
pub fn read_raw_config(config_path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path).map_err(|e| ConfigError::Io {
        path: config_path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })
}

/// Validate each field of a raw config, accumulating every problem.
/// Out-of-range fields keep their defaults.
pub fn validate_config(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut errors = Vec::new();

    // -- Import: default_mode --
    if let Some(ref mode) = raw.import.default_mode {
        match mode.parse::<ImportMode>() {
            Ok(m) => config.default_mode = m,
            Err(_) => errors.push(ConfigError::ValueOutOfRange {
                field: "[import] default_mode".to_string(),
                value: mode.clone(),
                expected: "excel, csv or manual".to_string(),
            }),
        }
    }

    // -- Import: century_window_years --
    if let Some(window) = raw.import.century_window_years {
        if window <= constants::MAX_CENTURY_WINDOW_YEARS {
            config.century_window_years = window;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[import] century_window_years".to_string(),
                value: window.to_string(),
                expected: format!(
                    "0-{} (default {})",
                    constants::MAX_CENTURY_WINDOW_YEARS,
                    constants::DEFAULT_CENTURY_WINDOW_YEARS
                ),
            });
        }
    }

    // -- Import: max_lines --
    if let Some(lines) = raw.import.max_lines {
        if (constants::MIN_MAX_IMPORT_LINES..=constants::ABSOLUTE_MAX_IMPORT_LINES)
            .contains(&lines)
        {
            config.max_lines = lines;
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[import] max_lines".to_string(),
                value: lines.to_string(),
                expected: format!(
                    "{}-{} (default {})",
                    constants::MIN_MAX_IMPORT_LINES,
                    constants::ABSOLUTE_MAX_IMPORT_LINES,
                    constants::DEFAULT_MAX_IMPORT_LINES
                ),
            });
        }
    }

    // -- Export: pretty_json --
    if let Some(pretty) = raw.export.pretty_json {
        config.pretty_json = pretty;
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            errors.push(ConfigError::ValueOutOfRange {
                field: "[logging] level".to_string(),
                value: level.clone(),
                expected: "error, warn, info, debug or trace".to_string(),
            });
        }
    }

    // -- Logging: file --
    if let Some(ref file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file.clone());
        }
    }

    (config, errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml_text: &str) -> (AppConfig, Vec<ConfigError>) {
        let raw: RawConfig = toml::from_str(toml_text).unwrap();
        validate_config(raw)
    }

    #[test]
    fn test_empty_config_is_default() {
        let (config, errors) = parse("");
        assert_eq!(config, AppConfig::default());
        assert!(errors.is_empty());
    }

    #[test]
    fn test_valid_values_applied() {
        let (config, errors) = parse(
            r#"
[import]
default_mode = "csv"
century_window_years = 5
max_lines = 200

[export]
pretty_json = false

[logging]
level = "debug"
file = "/tmp/herd.log"
"#,
        );
        assert!(errors.is_empty());
        assert_eq!(config.default_mode, ImportMode::Csv);
        assert_eq!(config.century_window_years, 5);
        assert_eq!(config.max_lines, 200);
        assert!(!config.pretty_json);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_file.as_deref(), Some("/tmp/herd.log"));
    }

    #[test]
    fn test_out_of_range_values_fall_back() {
        let (config, errors) = parse(
            r#"
[import]
default_mode = "xml"
century_window_years = 150
max_lines = 0

[logging]
level = "loud"
"#,
        );
        assert_eq!(errors.len(), 4);
        assert_eq!(config, AppConfig::default());
        assert!(errors
            .iter()
            .all(|e| matches!(e, ConfigError::ValueOutOfRange { .. })));
    }

    #[test]
    fn test_unknown_keys_ignored() {
        let (config, errors) = parse("[ui]\ntheme = \"dark\"\n[import]\nfuture_knob = 1\n");
        assert!(errors.is_empty());
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_config_file_under_config_dir() {
        let paths = PlatformPaths::resolve();
        assert!(paths.config_file().ends_with(constants::CONFIG_FILE_NAME));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let (config, warnings) = load_config(Path::new("/nonexistent/herdimport/config.toml"));
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }
}
