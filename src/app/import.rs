// HerdImport - app/import.rs
//
// Import orchestration: read the pasted text, run the batch with options
// resolved from config and CLI overrides, and write the requested exports.

use crate::core::export;
use crate::core::importer::{self, ImportOptions};
use crate::core::model::{ImportMode, ImportSummary};
use crate::platform::config::AppConfig;
use crate::platform::fs;
use crate::util::error::{ExportError, HerdImportError, Result};
use chrono::NaiveDate;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Process exit code for a clean batch.
pub const EXIT_OK: i32 = 0;
/// Process exit code when the batch was rejected or could not be read.
pub const EXIT_FAILURE: i32 = 1;
/// Process exit code when some rows failed.
pub const EXIT_ROW_ERRORS: i32 = 2;

/// Where the pasted text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// `-` means stdin; anything else is a file path.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::Stdin => "<stdin>".to_string(),
            InputSource::File(path) => path.display().to_string(),
        }
    }
}

/// Optional export destinations for one run.
#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    pub records_csv: Option<PathBuf>,
    pub errors_csv: Option<PathBuf>,
    pub summary_json: Option<PathBuf>,
}

impl ExportTargets {
    pub fn is_empty(&self) -> bool {
        self.records_csv.is_none() && self.errors_csv.is_none() && self.summary_json.is_none()
    }
}

/// Build batch options: CLI overrides win over config values.
pub fn resolve_options(
    config: &AppConfig,
    mode: Option<ImportMode>,
    today: Option<NaiveDate>,
) -> ImportOptions {
    let mut options = ImportOptions::new(mode.unwrap_or(config.default_mode));
    if let Some(today) = today {
        options.today = today;
    }
    options.century_window_years = config.century_window_years;
    options.max_lines = config.max_lines;
    options
}

/// Read the whole input as text.
pub fn read_input(source: &InputSource) -> Result<String> {
    match source {
        InputSource::Stdin => {
            fs::read_reader_lossy(std::io::stdin().lock()).map_err(|e| HerdImportError::Io {
                path: PathBuf::from("-"),
                operation: "read stdin",
                source: e,
            })
        }
        InputSource::File(path) => fs::read_file_lossy(path).map_err(|e| HerdImportError::Io {
            path: path.clone(),
            operation: "read input file",
            source: e,
        }),
    }
}

/// Read the input and import it. Batch rejections are folded into the
/// summary; only I/O failures surface as errors.
pub fn run_import(source: &InputSource, options: &ImportOptions) -> Result<ImportSummary> {
    let text = read_input(source)?;
    tracing::info!(
        source = %source.describe(),
        mode = %options.mode,
        today = %options.today,
        bytes = text.len(),
        "Import started"
    );
    Ok(importer::import_batch(&text, options))
}

/// Write every requested export. Stops at the first failure.
pub fn write_exports(
    summary: &ImportSummary,
    targets: &ExportTargets,
    pretty_json: bool,
) -> Result<()> {
    if let Some(ref path) = targets.records_csv {
        let writer = create_export_file(path)?;
        let count = export::export_records_csv(&summary.success, writer, path)?;
        tracing::info!(path = %path.display(), records = count, "Records CSV written");
    }

    if let Some(ref path) = targets.errors_csv {
        let writer = create_export_file(path)?;
        let count = export::export_errors_csv(&summary.errors, writer, path)?;
        tracing::info!(path = %path.display(), errors = count, "Errors CSV written");
    }

    if let Some(ref path) = targets.summary_json {
        let mut writer = create_export_file(path)?;
        let count = export::export_summary_json(summary, &mut writer, path, pretty_json)?;
        writer.flush().map_err(|e| ExportError::Io {
            path: path.clone(),
            source: e,
        })?;
        tracing::info!(path = %path.display(), entries = count, "Summary JSON written");
    }

    Ok(())
}

fn create_export_file(path: &Path) -> std::result::Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| ExportError::Io {
            path: path.to_path_buf(),
            source: e,
        })
}

/// Exit code for a finished batch.
pub fn exit_code(summary: &ImportSummary) -> i32 {
    if summary.is_rejected() {
        EXIT_FAILURE
    } else if !summary.errors.is_empty() {
        EXIT_ROW_ERRORS
    } else {
        EXIT_OK
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_source_from_arg() {
        assert_eq!(InputSource::from_arg("-"), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg("herd.tsv"),
            InputSource::File(PathBuf::from("herd.tsv"))
        );
    }

    #[test]
    fn test_resolve_options_prefers_cli() {
        let config = AppConfig {
            default_mode: ImportMode::Csv,
            century_window_years: 3,
            max_lines: 50,
            ..AppConfig::default()
        };
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let options = resolve_options(&config, Some(ImportMode::Manual), Some(today));
        assert_eq!(options.mode, ImportMode::Manual);
        assert_eq!(options.today, today);
        assert_eq!(options.century_window_years, 3);
        assert_eq!(options.max_lines, 50);

        let options = resolve_options(&config, None, None);
        assert_eq!(options.mode, ImportMode::Csv);
    }

    #[test]
    fn test_missing_input_file_is_io_error() {
        let source = InputSource::File(PathBuf::from("/nonexistent/herd.tsv"));
        let options = ImportOptions::new(ImportMode::Excel);
        let err = run_import(&source, &options).unwrap_err();
        assert!(matches!(err, HerdImportError::Io { .. }));
    }

    #[test]
    fn test_exit_codes() {
        let clean = ImportSummary {
            success: Vec::new(),
            errors: Vec::new(),
            total: 0,
        };
        assert_eq!(exit_code(&clean), EXIT_OK);

        let options = ImportOptions {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ..ImportOptions::new(ImportMode::Manual)
        };
        let partial = importer::import_batch("CJCJ|1|M|01/01/23|PAI|AVO\nbroken", &options);
        assert_eq!(exit_code(&partial), EXIT_ROW_ERRORS);

        let csv = ImportOptions {
            mode: ImportMode::Csv,
            ..options
        };
        let rejected = importer::import_batch("Serie,RGN\nCJCJ,1", &csv);
        assert_eq!(exit_code(&rejected), EXIT_FAILURE);
    }

    #[test]
    fn test_write_exports_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let options = ImportOptions {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ..ImportOptions::new(ImportMode::Manual)
        };
        let summary = importer::import_batch("CJCJ|1|M|01/01/23|PAI|AVO", &options);
        let targets = ExportTargets {
            records_csv: Some(dir.path().join("records.csv")),
            errors_csv: Some(dir.path().join("errors.csv")),
            summary_json: Some(dir.path().join("summary.json")),
        };

        write_exports(&summary, &targets, true).unwrap();

        let records = std::fs::read_to_string(dir.path().join("records.csv")).unwrap();
        assert_eq!(records.lines().count(), 2);
        let errors = std::fs::read_to_string(dir.path().join("errors.csv")).unwrap();
        assert_eq!(errors.lines().count(), 1);
        let json = std::fs::read_to_string(dir.path().join("summary.json")).unwrap();
        assert!(json.contains("\"total\": 1"));
    }

    #[test]
    fn test_export_into_missing_dir_fails() {
        let summary = ImportSummary {
            success: Vec::new(),
            errors: Vec::new(),
            total: 0,
        };
        let targets = ExportTargets {
            records_csv: Some(PathBuf::from("/nonexistent/dir/records.csv")),
            ..ExportTargets::default()
        };
        let err = write_exports(&summary, &targets, false).unwrap_err();
        assert!(matches!(err, HerdImportError::Export(ExportError::Io { .. })));
    }
}
