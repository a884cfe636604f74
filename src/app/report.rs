// HerdImport - app/report.rs
//
// Plain-text summary of a finished batch for the terminal.

use crate::core::model::{format_cents, ImportSummary};
use crate::util::constants;
use std::fmt::Write;

/// Render the batch report: counts, cost total, one line per error.
pub fn render_report(summary: &ImportSummary, source: &str) -> String {
    let mut out = String::new();

    if summary.is_rejected() {
        let _ = writeln!(out, "{source}: batch rejected");
        for err in &summary.errors {
            let _ = writeln!(out, "  [{}] {}", err.code, err.reason);
        }
        return out;
    }

    let _ = writeln!(
        out,
        "{source}: {} line(s) processed, {} imported, {} failed",
        summary.total,
        summary.success.len(),
        summary.errors.len()
    );

    if !summary.success.is_empty() {
        let _ = writeln!(
            out,
            "  Inferred costs: {} across {} record(s)",
            format_cents(summary.total_cost_cents()),
            summary.success.len()
        );
    }

    if !summary.errors.is_empty() {
        let _ = writeln!(out, "Errors:");
        for err in &summary.errors {
            let _ = writeln!(
                out,
                "  line {:>4} [{}] {}: {}",
                err.line_number,
                err.code,
                err.reason,
                truncate(&err.raw_text)
            );
        }
    }

    out
}

fn truncate(text: &str) -> String {
    if text.chars().count() > constants::REPORT_RAW_TEXT_WIDTH {
        let cut: String = text
            .chars()
            .take(constants::REPORT_RAW_TEXT_WIDTH)
            .collect();
        format!("{cut}...")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::importer::{import_batch, ImportOptions};
    use crate::core::model::ImportMode;
    use chrono::NaiveDate;

    fn options(mode: ImportMode) -> ImportOptions {
        ImportOptions {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ..ImportOptions::new(mode)
        }
    }

    #[test]
    fn test_report_counts_and_errors() {
        let summary = import_batch(
            "CJCJ|1|M|01/01/23|PAI|AVO\nCJCJ|2|X|01/01/23|PAI|AVO",
            &options(ImportMode::Manual),
        );
        let report = render_report(&summary, "paste.txt");

        assert!(report.starts_with("paste.txt: 2 line(s) processed, 1 imported, 1 failed"));
        assert!(report.contains("Inferred costs: 130.00 across 1 record(s)"));
        assert!(report.contains("line    2 [InvalidSex]"));
    }

    #[test]
    fn test_report_rejected_batch() {
        let summary = import_batch("Serie,RGN\nCJCJ,1", &options(ImportMode::Csv));
        let report = render_report(&summary, "<stdin>");

        assert!(report.starts_with("<stdin>: batch rejected"));
        assert!(report.contains("[InvalidCsvHeader]"));
        assert!(!report.contains("Inferred costs"));
    }

    #[test]
    fn test_long_raw_text_truncated() {
        let long = "X".repeat(constants::REPORT_RAW_TEXT_WIDTH + 10);
        let cut = truncate(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), constants::REPORT_RAW_TEXT_WIDTH + 3);
    }
}
