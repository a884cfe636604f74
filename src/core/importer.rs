// HerdImport - core/importer.rs
//
// Batch orchestration: header handling, then tokenize -> map -> classify
// coverage -> validate -> schedule costs for every data line.
// A failing row becomes an ImportError and the batch moves on; only the
// CSV header check and the line limit reject a whole batch.
// Core layer: pure logic, no I/O.

use crate::core::costs;
use crate::core::mapper::{self, CsvColumns, FieldLayout};
use crate::core::model::{
    ImportError, ImportMode, ImportRow, ImportSummary, NormalizedAnimalRecord,
};
use crate::core::tokenizer::{self, Delimiter};
use crate::core::validator;
use crate::util::constants;
use crate::util::error::{BatchError, RowError};
use crate::util::logging::preview;
use chrono::{NaiveDate, Utc};

/// Options for one batch run.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub mode: ImportMode,
    /// Reference date for two-digit years and computed ages.
    pub today: NaiveDate,
    pub century_window_years: u32,
    pub max_lines: usize,
}

impl ImportOptions {
    /// Defaults for `mode`, dated today (UTC).
    pub fn new(mode: ImportMode) -> Self {
        Self {
            mode,
            today: Utc::now().date_naive(),
            century_window_years: constants::DEFAULT_CENTURY_WINDOW_YEARS,
            max_lines: constants::DEFAULT_MAX_IMPORT_LINES,
        }
    }
}

/// Run a batch, folding a batch-level rejection into the summary as a
/// single synthetic error with no successes and a total of 0.
pub fn import_batch(text: &str, options: &ImportOptions) -> ImportSummary {
    match try_import_batch(text, options) {
        Ok(summary) => summary,
        Err(e) => {
            tracing::warn!(mode = %options.mode, error = %e, "Batch rejected");
            ImportSummary {
                success: Vec::new(),
                errors: vec![ImportError::from_batch(&e)],
                total: 0,
            }
        }
    }
}

/// Run a batch, returning batch-level rejections as a typed error.
pub fn try_import_batch(text: &str, options: &ImportOptions) -> Result<ImportSummary, BatchError> {
    let mut rows: Vec<ImportRow<'_>> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| ImportRow {
            line_number: idx + 1,
            text: line,
        })
        .collect();

    let layout = match options.mode {
        ImportMode::Csv => {
            let Some(header) = rows.first().copied() else {
                return Ok(ImportSummary::default());
            };
            let cells = tokenizer::split_csv_line(header.text);
            let columns = CsvColumns::from_header(&cells).map_err(|missing| {
                BatchError::InvalidCsvHeader {
                    line_number: header.line_number,
                    header: header.text.to_string(),
                    missing,
                }
            })?;
            rows.remove(0);
            FieldLayout::Csv(columns)
        }
        ImportMode::Excel => {
            if rows.first().is_some_and(|r| looks_like_header(r.text)) {
                let header = rows.remove(0);
                tracing::debug!(line = header.line_number, "Discarded spreadsheet header");
            }
            FieldLayout::Sheet
        }
        ImportMode::Manual => FieldLayout::Manual,
    };

    if rows.len() > options.max_lines {
        return Err(BatchError::TooManyLines {
            count: rows.len(),
            max: options.max_lines,
        });
    }

    let mut summary = ImportSummary {
        total: rows.len(),
        ..ImportSummary::default()
    };

    for row in &rows {
        match process_row(row, &layout, options) {
            Ok(record) => summary.success.push(record),
            Err(e) => {
                tracing::debug!(
                    line = row.line_number,
                    code = e.code(),
                    text = %preview(row.text),
                    "Row rejected: {e}"
                );
                summary.errors.push(ImportError::from_row(row, &e));
            }
        }
    }

    tracing::info!(
        mode = %options.mode,
        total = summary.total,
        success = summary.success.len(),
        errors = summary.errors.len(),
        "Import batch complete"
    );

    Ok(summary)
}

/// Run one data line through the full pipeline.
pub fn process_row(
    row: &ImportRow<'_>,
    layout: &FieldLayout,
    options: &ImportOptions,
) -> Result<NormalizedAnimalRecord, RowError> {
    let tokens = tokenizer::tokenize(row.text, options.mode)?;
    let fields = mapper::map_tokens(&tokens, layout);
    let coverage = costs::classify_coverage(fields.coverage_code.as_deref());
    let valid = validator::validate(&fields, options.today, options.century_window_years)?;
    let schedule = costs::schedule_costs(coverage, valid.birth_date);

    Ok(NormalizedAnimalRecord {
        line_number: row.line_number,
        series: valid.series,
        registry: valid.registry,
        breed: valid.breed,
        sex: valid.sex,
        birth_date: valid.birth_date,
        age_months: valid.age_months,
        sire: fields.sire,
        maternal_grandsire: fields.maternal_grandsire,
        coverage: schedule.coverage,
        costs: schedule.items,
        total_cost_cents: schedule.total_cents,
        metrics: fields.metrics,
    })
}

/// Whether a spreadsheet line is a header row.
///
/// A line holding a `/` date or opening with a supported series is data.
/// Otherwise it is a header when any token starts with one of the header
/// keywords (`Série`, `RGN`, `Nascimento`, ...). Tokens are compared whole
/// so that names such as `JORGE` do not trip the check.
pub fn looks_like_header(line: &str) -> bool {
    let tokens = Delimiter::detect(line).split(line);
    let is_data = tokens.iter().any(|t| t.contains('/'))
        || tokens
            .first()
            .is_some_and(|t| validator::breed_for_series(t).is_some());
    if is_data {
        return false;
    }

    tokens.iter().any(|token| {
        let lower = fold_accents(&token.to_lowercase());
        constants::HEADER_KEYWORDS
            .iter()
            .any(|k| lower.starts_with(k))
    })
}

fn fold_accents(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Coverage, Sex};
    use crate::util::constants::{DNA_GENOMIC_FEE_CENTS, DNA_PATERNITY_FEE_CENTS};

    const SHEET_ROW: &str = "CJCJ\t15628\t22\t3\t913\t42\tM\t24,62\t1\t22,1\t8\t09/08/23\t24\tREM HERMOSO FIV GEN\tB2887 DA S.NICE";

    fn options(mode: ImportMode) -> ImportOptions {
        ImportOptions {
            today: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            ..ImportOptions::new(mode)
        }
    }

    #[test]
    fn test_spreadsheet_scenario() {
        let summary = import_batch(SHEET_ROW, &options(ImportMode::Excel));
        assert_eq!(summary.total, 1);
        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        let r = &summary.success[0];
        assert_eq!(r.series, "CJCJ");
        assert_eq!(r.registry, "15628");
        assert_eq!(r.sex, Sex::Male);
        assert_eq!(r.birth_date.to_string(), "2023-08-09");
        assert_eq!(r.age_months, 24);
        assert_eq!(r.sire, "REM HERMOSO FIV GEN");
        assert_eq!(r.maternal_grandsire, "B2887 DA S.NICE");
        assert_eq!(r.breed, "Nelore");
        assert_eq!(r.coverage, Coverage::Fiv);
        assert_eq!(r.line_number, 1);
    }

    #[test]
    fn test_csv_scenario_defaults_to_fiv() {
        let text = "Serie,RGN,Nascimento,Pai,AvoMaterno,Sexo\n\
                    CJCJ,123456,2022-01-15,CJCJ 100001,CJCJ 100002,Macho";
        let summary = import_batch(text, &options(ImportMode::Csv));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.success.len(), 1, "{:?}", summary.errors);
        let r = &summary.success[0];
        assert_eq!(r.registry, "123456");
        assert_eq!(r.birth_date.to_string(), "2022-01-15");
        assert_eq!(r.sex, Sex::Male);
        assert_eq!(r.coverage, Coverage::Fiv);
        assert_eq!(r.costs.len(), 2);
        assert_eq!(
            r.total_cost_cents,
            DNA_PATERNITY_FEE_CENTS + DNA_GENOMIC_FEE_CENTS
        );
        assert_eq!(r.line_number, 2);
    }

    #[test]
    fn test_csv_bad_header_rejects_batch() {
        let text = "Serie,RGN,Nascimento,Pai,Sexo\n\
                    CJCJ,1,2022-01-15,PAI,M\n\
                    CJCJ,2,2022-01-15,PAI,F";
        let summary = import_batch(text, &options(ImportMode::Csv));
        assert!(summary.success.is_empty());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.total, 0);
        assert!(summary.is_rejected());
        assert_eq!(summary.errors[0].code, "InvalidCsvHeader");
        assert!(summary.errors[0].reason.contains("AvoMaterno"));

        let err = try_import_batch(text, &options(ImportMode::Csv)).unwrap_err();
        assert!(matches!(err, BatchError::InvalidCsvHeader { line_number: 1, .. }));
    }

    #[test]
    fn test_csv_without_header_rejected() {
        let text = "CJCJ,123456,2022-01-15,PAI,AVO,M";
        let summary = import_batch(text, &options(ImportMode::Csv));
        assert!(summary.is_rejected());
    }

    #[test]
    fn test_manual_malformed_line_isolated() {
        let text = "CJCJ|1|M|01/01/23|PAI|AVO\n\
                    CJCJ|2|F|01/01/23|PAI\n\
                    CJCJ|3|F|01/01/23|PAI|AVO|EXTRA";
        let summary = import_batch(text, &options(ImportMode::Manual));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.success.len(), 1);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors.iter().all(|e| e.code == "MalformedLine"));
        assert_eq!(summary.errors[0].line_number, 2);
        assert_eq!(summary.errors[1].raw_text, "CJCJ|3|F|01/01/23|PAI|AVO|EXTRA");
    }

    #[test]
    fn test_spreadsheet_mixed_rows() {
        let bad = "CJCJ\t15629\t22\t3\t913\t42\tF\t24,62\t1\t22,1\t8\t2023-08-09\t24\tPAI\tAVO";
        let text = format!("{SHEET_ROW}\n{bad}");
        let summary = import_batch(&text, &options(ImportMode::Excel));
        assert_eq!(summary.total, 2);
        assert_eq!(summary.success.len(), 1);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].code, "DateNotFound");
        assert_eq!(summary.errors[0].line_number, 2);
    }

    #[test]
    fn test_spreadsheet_header_and_blank_lines_excluded() {
        let text = format!("Série\tRGN\tLote\tLocal\tPeso\tCE\tSexo\tiABCZ\tDeca\tMGTe\tTop\tNasc\tIdade\tPai\tAvô\n\n{SHEET_ROW}\n   \n");
        let summary = import_batch(&text, &options(ImportMode::Excel));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.success.len(), 1);
        assert_eq!(summary.success[0].line_number, 3);
    }

    #[test]
    fn test_spreadsheet_blank_age_keeps_fiv_costs() {
        let text = SHEET_ROW.replace("09/08/23\t24\t", "09/08/23\t\t");
        let summary = import_batch(&text, &options(ImportMode::Excel));
        assert!(summary.errors.is_empty(), "{:?}", summary.errors);
        let r = &summary.success[0];
        assert_eq!(r.sire, "REM HERMOSO FIV GEN");
        assert_eq!(r.maternal_grandsire, "B2887 DA S.NICE");
        assert_eq!(r.coverage, Coverage::Fiv);
        assert_eq!(
            r.total_cost_cents,
            DNA_PATERNITY_FEE_CENTS + DNA_GENOMIC_FEE_CENTS
        );
        // 2023-08-09 to 2026-10-19 is 1167 days.
        assert_eq!(r.age_months, 38);
    }

    #[test]
    fn test_first_row_with_keyword_name_is_kept() {
        let text = "CJCJ 15628 M 1 2 09/08/23 24 NASCIMENTO FELIZ B2887 DA S.NICE";
        let summary = import_batch(text, &options(ImportMode::Excel));
        assert_eq!(summary.total, 1);
        assert_eq!(summary.success.len(), 1, "{:?}", summary.errors);
        assert_eq!(summary.success[0].sire, "NASCIMENTO FELIZ");
    }

    #[test]
    fn test_unsupported_series_is_row_error() {
        let text = SHEET_ROW.replacen("CJCJ", "XPTO", 1);
        let summary = import_batch(&text, &options(ImportMode::Excel));
        assert_eq!(summary.errors[0].code, "UnsupportedSeries");
        assert!(!summary.is_rejected());
    }

    #[test]
    fn test_too_many_lines_rejects_batch() {
        let text = "CJCJ|1|M|01/01/23|PAI|AVO\nCJCJ|2|M|01/01/23|PAI|AVO";
        let opts = ImportOptions {
            max_lines: 1,
            ..options(ImportMode::Manual)
        };
        let summary = import_batch(text, &opts);
        assert!(summary.is_rejected());
        assert_eq!(summary.errors[0].code, "TooManyLines");
    }

    #[test]
    fn test_empty_input() {
        for mode in ImportMode::all() {
            let summary = import_batch("\n \n", &options(*mode));
            assert_eq!(summary.total, 0);
            assert!(summary.errors.is_empty());
        }
    }

    #[test]
    fn test_header_detection() {
        assert!(looks_like_header("Série RGN Nasc"));
        assert!(looks_like_header("serie,rgn,nascimento"));
        assert!(!looks_like_header(SHEET_ROW));
        assert!(!looks_like_header("CJCJ 1 2 3 4 5 M 6 7 8 9 01/01/23 12 JORGE AVO"));
        assert!(!looks_like_header("CJCJ\tRGN TESTE\tSERIE"));
        assert!(!looks_like_header("XPTO 1 M 09/08/23 NASCIMENTO AVO"));
    }
}
