// HerdImport - core/mapper.rs
//
// Maps positional tokens onto named fields for each import layout.
// Pure transform: no validation, no side effects.

use crate::core::model::{MappedFields, SheetMetrics, Sex, TokenSet};
use crate::util::constants;
use regex::Regex;
use std::sync::OnceLock;

/// Resolved column positions for a CSV batch, taken from its header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvColumns {
    pub series: usize,
    pub registry: usize,
    pub birth: usize,
    pub sire: usize,
    pub maternal_grandsire: usize,
    pub sex: usize,
    pub age: Option<usize>,
    pub coverage: Option<usize>,
}

impl CsvColumns {
    /// Resolve columns from header cells.
    ///
    /// Matching is case-insensitive. On failure returns the names of every
    /// required column the header lacks.
    pub fn from_header(header: &[String]) -> Result<Self, Vec<String>> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let missing: Vec<String> = constants::CSV_REQUIRED_COLUMNS
            .iter()
            .filter(|c| find(c).is_none())
            .map(|c| c.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        let required = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            series: required("Serie"),
            registry: required("RGN"),
            birth: required("Nascimento"),
            sire: required("Pai"),
            maternal_grandsire: required("AvoMaterno"),
            sex: required("Sexo"),
            age: find(constants::CSV_AGE_COLUMN),
            coverage: find(constants::CSV_COVERAGE_COLUMN),
        })
    }
}

/// Positional layout of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLayout {
    /// Spreadsheet paste; positions come from each row's anchors.
    Sheet,
    /// CSV with columns resolved from the header.
    Csv(CsvColumns),
    /// Manual `series|registry|sex|birth|sire|grandsire`.
    Manual,
}

/// Map a token set onto named fields.
pub fn map_tokens(tokens: &TokenSet, layout: &FieldLayout) -> MappedFields {
    match layout {
        FieldLayout::Csv(cols) => MappedFields {
            series: tokens.get(cols.series).to_string(),
            registry: tokens.get(cols.registry).to_string(),
            sex: tokens.get(cols.sex).to_string(),
            birth: tokens.get(cols.birth).to_string(),
            age: cols.age.map(|i| tokens.get(i).to_string()).filter(|s| !s.is_empty()),
            sire: tokens.get(cols.sire).to_string(),
            maternal_grandsire: tokens.get(cols.maternal_grandsire).to_string(),
            coverage_code: cols
                .coverage
                .map(|i| tokens.get(i).to_string())
                .filter(|s| !s.is_empty()),
            metrics: None,
        },
        FieldLayout::Manual => MappedFields {
            series: tokens.get(0).to_string(),
            registry: tokens.get(1).to_string(),
            sex: tokens.get(2).to_string(),
            birth: tokens.get(3).to_string(),
            age: None,
            sire: tokens.get(4).to_string(),
            maternal_grandsire: tokens.get(5).to_string(),
            coverage_code: None,
            metrics: None,
        },
        FieldLayout::Sheet => map_sheet(tokens),
    }
}

fn map_sheet(tokens: &TokenSet) -> MappedFields {
    let Some(anchors) = tokens.anchors else {
        return MappedFields::default();
    };

    // Shorter rows are scanned for the first recognisable spelling before
    // the date. Empty when absent.
    let sex = if anchors.date == constants::FULL_SHEET_DATE_INDEX {
        tokens.get(constants::FULL_SHEET_SEX_INDEX).to_string()
    } else {
        tokens.fields[2.min(anchors.date)..anchors.date]
            .iter()
            .find(|t| Sex::parse(t).is_some())
            .cloned()
            .unwrap_or_default()
    };

    let age = (anchors.names > anchors.date + 1)
        .then(|| tokens.get(anchors.date + 1).to_string())
        .filter(|a| !a.is_empty());
    let sire = tokens.get(anchors.names).to_string();

    let coverage_code = Some(tokens.get(anchors.names + 2).to_string())
        .filter(|c| !c.is_empty())
        .or_else(|| coverage_marker(&sire).map(str::to_string));

    let metrics = (anchors.date == constants::FULL_SHEET_DATE_INDEX).then(|| sheet_metrics(tokens));

    MappedFields {
        series: tokens.get(0).to_string(),
        registry: tokens.get(1).to_string(),
        sex,
        birth: tokens.get(anchors.date).to_string(),
        age,
        sire,
        maternal_grandsire: tokens.get(anchors.names + 1).to_string(),
        coverage_code,
        metrics,
    }
}

fn coverage_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)\b(F\.?I\.?V\.?|I\.?A\.?)(?:\s|$)").expect("coverage marker regex")
    })
}

/// Whole-word coverage marker embedded in an animal name
/// (`"REM HERMOSO FIV GEN"` -> `"FIV"`).
pub fn coverage_marker(name: &str) -> Option<&str> {
    coverage_marker_re()
        .captures(name)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Parse a decimal cell, accepting a decimal comma.
fn parse_decimal(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', ".").parse().ok()
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

fn sheet_metrics(tokens: &TokenSet) -> SheetMetrics {
    SheetMetrics {
        lot: non_empty(tokens.get(2)),
        location: non_empty(tokens.get(3)),
        weight_kg: parse_decimal(tokens.get(4)),
        scrotal_circumference_cm: parse_decimal(tokens.get(5)),
        index: parse_decimal(tokens.get(7)),
        deca: tokens.get(8).trim().parse().ok(),
        mgte: parse_decimal(tokens.get(9)),
        top_percent: parse_decimal(tokens.get(10)),
    }
}
