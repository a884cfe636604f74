// HerdImport - core/export.rs
//
// CSV and JSON export of import summaries.
// Core layer: writes to any Write trait object; the path is for error
// context only.

use crate::core::model::{format_cents, ImportError, ImportSummary, NormalizedAnimalRecord};
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

/// Export successful records to CSV, one row per record.
///
/// Writes: line, series, registry, breed, sex, birth_date, age_months, sire,
/// maternal_grandsire, coverage, cost_items, total_cost
pub fn export_records_csv<W: Write>(
    records: &[NormalizedAnimalRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "line",
            "series",
            "registry",
            "breed",
            "sex",
            "birth_date",
            "age_months",
            "sire",
            "maternal_grandsire",
            "coverage",
            "cost_items",
            "total_cost",
        ])
        .map_err(csv_err)?;

    for record in records {
        let row = [
            record.line_number.to_string(),
            record.series.clone(),
            record.registry.clone(),
            record.breed.clone(),
            record.sex.label().to_string(),
            record.birth_date.format("%Y-%m-%d").to_string(),
            record.age_months.to_string(),
            record.sire.clone(),
            record.maternal_grandsire.clone(),
            record.coverage.label().to_string(),
            record.costs.len().to_string(),
            format_cents(record.total_cost_cents),
        ];
        csv_writer.write_record(&row).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export row errors to CSV.
///
/// Writes: line, code, reason, raw_text
pub fn export_errors_csv<W: Write>(
    errors: &[ImportError],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["line", "code", "reason", "raw_text"])
        .map_err(csv_err)?;

    for error in errors {
        let row = [
            error.line_number.to_string(),
            error.code.clone(),
            error.reason.clone(),
            error.raw_text.clone(),
        ];
        csv_writer.write_record(&row).map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(errors.len())
}

/// Export the whole summary as a JSON object
/// (`{ "success": [...], "errors": [...], "total": n }`).
pub fn export_summary_json<W: Write>(
    summary: &ImportSummary,
    writer: W,
    export_path: &Path,
    pretty: bool,
) -> Result<usize, ExportError> {
    let result = if pretty {
        serde_json::to_writer_pretty(writer, summary)
    } else {
        serde_json::to_writer(writer, summary)
    };
    result.map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(summary.success.len() + summary.errors.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::importer::{import_batch, ImportOptions};
    use crate::core::model::ImportMode;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn summary() -> ImportSummary {
        let text = "CJCJ|1|M|01/01/23|REM, JR|AVO\nCJCJ|2|X|01/01/23|PAI|AVO";
        let options = ImportOptions {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ..ImportOptions::new(ImportMode::Manual)
        };
        import_batch(text, &options)
    }

    #[test]
    fn test_records_csv_export() {
        let s = summary();
        let mut buf = Vec::new();
        let count = export_records_csv(&s.success, &mut buf, &PathBuf::from("out.csv")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.starts_with("line,series,registry"));
        assert!(output.contains("\"REM, JR\""));
        assert!(output.contains("130.00"));
    }

    #[test]
    fn test_errors_csv_export() {
        let s = summary();
        let mut buf = Vec::new();
        let count = export_errors_csv(&s.errors, &mut buf, &PathBuf::from("err.csv")).unwrap();
        assert_eq!(count, 1);

        let output = String::from_utf8(buf).unwrap();
        assert!(output.contains("InvalidSex"));
        assert!(output.contains("CJCJ|2|X|01/01/23|PAI|AVO"));
    }

    #[test]
    fn test_json_export_shape() {
        let s = summary();
        let mut buf = Vec::new();
        export_summary_json(&s, &mut buf, &PathBuf::from("out.json"), false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["total"], 2);
        assert_eq!(value["success"][0]["birth_date"], "2023-01-01");
        assert_eq!(value["success"][0]["sex"], "Macho");
        assert_eq!(value["errors"][0]["code"], "InvalidSex");
    }
}
