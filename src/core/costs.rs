// HerdImport - core/costs.rs
//
// Coverage classification and the flat lab-fee schedule it implies.
// Amounts are fixed constants; pricing is not configurable here.

use crate::core::model::{CostKind, CostLineItem, Coverage};
use crate::util::constants::{DNA_GENOMIC_FEE_CENTS, DNA_PATERNITY_FEE_CENTS};
use chrono::NaiveDate;

/// Inferred fees for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostSchedule {
    pub coverage: Coverage,
    pub items: Vec<CostLineItem>,
    pub total_cents: i64,
}

/// Classify a coverage-type code.
///
/// `FIV` anywhere in the code (case-insensitive, dots and spaces ignored)
/// wins, then `IA`/`I.A`; any other non-empty code is kept verbatim.
/// A missing or blank code falls back to FIV, matching older inputs that
/// never carried one.
pub fn classify_coverage(code: Option<&str>) -> Coverage {
    let Some(code) = code.map(str::trim).filter(|c| !c.is_empty()) else {
        return Coverage::Fiv;
    };

    let upper = code.to_uppercase();
    let squashed: String = upper.chars().filter(|c| *c != '.' && *c != ' ').collect();

    if squashed.contains("FIV") {
        Coverage::Fiv
    } else if upper.contains("IA") || upper.contains("I.A") {
        Coverage::Ia
    } else {
        Coverage::Other(code.to_string())
    }
}

/// Fee kinds charged for a coverage classification, in order.
pub fn fee_kinds(coverage: &Coverage) -> &'static [CostKind] {
    match coverage {
        Coverage::Fiv => &[CostKind::DnaPaternity, CostKind::DnaGenomic],
        Coverage::Ia | Coverage::Other(_) => &[CostKind::DnaGenomic],
    }
}

/// Flat amount for a fee kind.
pub fn fee_amount(kind: CostKind) -> i64 {
    match kind {
        CostKind::DnaPaternity => DNA_PATERNITY_FEE_CENTS,
        CostKind::DnaGenomic => DNA_GENOMIC_FEE_CENTS,
    }
}

/// Build the cost schedule for a classified record, every item dated to
/// the birth date.
pub fn schedule_costs(coverage: Coverage, birth_date: NaiveDate) -> CostSchedule {
    let items: Vec<CostLineItem> = fee_kinds(&coverage)
        .iter()
        .map(|&kind| CostLineItem {
            kind,
            amount_cents: fee_amount(kind),
            date: birth_date,
            note: format!(
                "{} {} fee inferred from coverage {}",
                kind.category(),
                kind.subtype(),
                coverage.label()
            ),
        })
        .collect();
    let total_cents = items.iter().map(|i| i.amount_cents).sum();

    CostSchedule {
        coverage,
        items,
        total_cents,
    }
}

/// Classify and schedule in one step.
pub fn infer_costs(code: Option<&str>, birth_date: NaiveDate) -> CostSchedule {
    schedule_costs(classify_coverage(code), birth_date)
}
