// HerdImport - core/model.rs
//
// Core data model types. Pure data definitions with no I/O and no
// platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::error::{BatchError, RowError};
use chrono::NaiveDate;
use serde::Serialize;
use std::str::FromStr;

// =============================================================================
// Import mode
// =============================================================================

/// How pasted text is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Rows pasted from a spreadsheet: tab, comma or whitespace separated,
    /// fixed metrics prefix followed by two free-text name fields.
    #[default]
    Excel,

    /// Comma-separated rows under a mandatory header line.
    Csv,

    /// Hand-typed `series|registry|sex|birth|sire|grandsire` lines.
    Manual,
}

impl ImportMode {
    /// Returns all variants in display order.
    pub fn all() -> &'static [ImportMode] {
        &[ImportMode::Excel, ImportMode::Csv, ImportMode::Manual]
    }

    /// Selector string used on the CLI and in config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Excel => "excel",
            ImportMode::Csv => "csv",
            ImportMode::Manual => "manual",
        }
    }
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "excel" | "spreadsheet" | "tsv" => Ok(ImportMode::Excel),
            "csv" => Ok(ImportMode::Csv),
            "manual" => Ok(ImportMode::Manual),
            other => Err(format!(
                "unknown import mode '{other}'. Expected: excel, csv or manual"
            )),
        }
    }
}

// =============================================================================
// Rows and tokens
// =============================================================================

/// One raw input line plus its 1-based line number in the pasted text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportRow<'a> {
    pub line_number: usize,
    pub text: &'a str,
}

/// Field positions located while tokenizing a spreadsheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetAnchors {
    /// Index of the birth date token (first token containing `/`).
    pub date: usize,

    /// Index of the sire name. The maternal grandsire follows it, then an
    /// optional coverage-type code.
    pub names: usize,
}

/// Ordered field tokens extracted from one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub fields: Vec<String>,

    /// Present for spreadsheet rows only.
    pub anchors: Option<SheetAnchors>,
}

impl TokenSet {
    /// Token at `idx`, or "" when the row is shorter.
    pub fn get(&self, idx: usize) -> &str {
        self.fields.get(idx).map(String::as_str).unwrap_or("")
    }
}

/// Numeric columns of the full spreadsheet layout.
///
/// Every field is optional: a cell that does not parse is simply absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetMetrics {
    pub lot: Option<String>,
    pub location: Option<String>,
    pub weight_kg: Option<f64>,
    pub scrotal_circumference_cm: Option<f64>,
    pub index: Option<f64>,
    pub deca: Option<u8>,
    pub mgte: Option<f64>,
    pub top_percent: Option<f64>,
}

/// Named fields pulled out of a token set, not yet validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappedFields {
    pub series: String,
    pub registry: String,
    pub sex: String,
    pub birth: String,
    pub age: Option<String>,
    pub sire: String,
    pub maternal_grandsire: String,
    /// Coverage-type code; `None` when the input format has none.
    pub coverage_code: Option<String>,
    pub metrics: Option<SheetMetrics>,
}

// =============================================================================
// Sex
// =============================================================================

/// Canonical sex values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Sex {
    #[serde(rename = "Macho")]
    Male,
    #[serde(rename = "Fêmea")]
    Female,
}

impl Sex {
    /// Canonical spelling.
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Macho",
            Sex::Female => "Fêmea",
        }
    }

    /// Map an input spelling onto a canonical value.
    ///
    /// Accepts `M`/`F` and the canonical words with or without the accent,
    /// case-insensitively. Anything else is `None`.
    pub fn parse(raw: &str) -> Option<Sex> {
        match raw.trim().to_lowercase().as_str() {
            "m" | "macho" => Some(Sex::Male),
            "f" | "fêmea" | "femea" => Some(Sex::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Coverage and costs
// =============================================================================

/// Breeding method the animal was conceived by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "code")]
pub enum Coverage {
    /// In-vitro fertilisation.
    Fiv,
    /// Artificial insemination.
    Ia,
    /// Any other code, kept verbatim.
    Other(String),
}

impl Coverage {
    pub fn label(&self) -> &str {
        match self {
            Coverage::Fiv => "FIV",
            Coverage::Ia => "IA",
            Coverage::Other(code) => code,
        }
    }
}

impl std::fmt::Display for Coverage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lab fee kinds attached to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CostKind {
    DnaPaternity,
    DnaGenomic,
}

impl CostKind {
    /// Top-level cost category.
    pub fn category(&self) -> &'static str {
        "DNA"
    }

    /// Subtype shown next to the category.
    pub fn subtype(&self) -> &'static str {
        match self {
            CostKind::DnaPaternity => "Paternity",
            CostKind::DnaGenomic => "Genomic",
        }
    }
}

/// One inferred lab fee. Owned by exactly one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostLineItem {
    pub kind: CostKind,
    pub amount_cents: i64,
    pub date: NaiveDate,
    pub note: String,
}

// =============================================================================
// Output records
// =============================================================================

/// A validated animal record ready to be handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAnimalRecord {
    /// Input line the record came from.
    pub line_number: usize,
    pub series: String,
    pub registry: String,
    /// Derived from the series, never read from input.
    pub breed: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub age_months: u32,
    pub sire: String,
    pub maternal_grandsire: String,
    pub coverage: Coverage,
    pub costs: Vec<CostLineItem>,
    pub total_cost_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<SheetMetrics>,
}

/// A row that failed one of the processing steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportError {
    pub line_number: usize,
    pub raw_text: String,
    /// Stable error code (e.g. `InvalidSex`).
    pub code: String,
    /// Human-readable reason.
    pub reason: String,
}

impl ImportError {
    pub fn from_row(row: &ImportRow<'_>, err: &RowError) -> Self {
        Self {
            line_number: row.line_number,
            raw_text: row.text.to_string(),
            code: err.code().to_string(),
            reason: err.to_string(),
        }
    }

    /// The single synthetic entry standing for a rejected batch.
    pub fn from_batch(err: &BatchError) -> Self {
        let (line_number, raw_text) = match err {
            BatchError::InvalidCsvHeader {
                line_number,
                header,
                ..
            } => (*line_number, header.clone()),
            BatchError::TooManyLines { .. } => (0, String::new()),
        };
        Self {
            line_number,
            raw_text,
            code: err.code().to_string(),
            reason: err.to_string(),
        }
    }
}

// =============================================================================
// Import summary
// =============================================================================

/// Outcome of one batch: every success, every failure, and the number of
/// data lines considered (header and blank lines excluded).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub success: Vec<NormalizedAnimalRecord>,
    pub errors: Vec<ImportError>,
    pub total: usize,
}

impl ImportSummary {
    /// True when the whole batch was refused before any row was processed.
    pub fn is_rejected(&self) -> bool {
        self.total == 0 && self.success.is_empty() && self.errors.len() == 1
    }

    /// Sum of every record's inferred costs.
    pub fn total_cost_cents(&self) -> i64 {
        self.success.iter().map(|r| r.total_cost_cents).sum()
    }
}

/// Format cents as a decimal amount (`13000` -> `"130.00"`).
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str_accepts_aliases() {
        assert_eq!("excel".parse::<ImportMode>(), Ok(ImportMode::Excel));
        assert_eq!("Spreadsheet".parse::<ImportMode>(), Ok(ImportMode::Excel));
        assert_eq!(" CSV ".parse::<ImportMode>(), Ok(ImportMode::Csv));
        assert_eq!("manual".parse::<ImportMode>(), Ok(ImportMode::Manual));
        assert!("xml".parse::<ImportMode>().is_err());
    }

    #[test]
    fn test_sex_mapping() {
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse("macho"), Some(Sex::Male));
        assert_eq!(Sex::parse("f"), Some(Sex::Female));
        assert_eq!(Sex::parse("Fêmea"), Some(Sex::Female));
        assert_eq!(Sex::parse("FEMEA"), Some(Sex::Female));
        assert_eq!(Sex::parse("X"), None);
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn test_sex_serialises_canonical_spelling() {
        assert_eq!(serde_json::to_string(&Sex::Female).unwrap(), "\"Fêmea\"");
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(13_000), "130.00");
        assert_eq!(format_cents(8_005), "80.05");
        assert_eq!(format_cents(-250), "-2.50");
    }

    #[test]
    fn test_rejected_summary_shape() {
        let summary = ImportSummary {
            success: Vec::new(),
            errors: vec![ImportError::from_batch(&BatchError::TooManyLines {
                count: 5,
                max: 2,
            })],
            total: 0,
        };
        assert!(summary.is_rejected());
        assert_eq!(summary.errors[0].code, "TooManyLines");
    }
}
