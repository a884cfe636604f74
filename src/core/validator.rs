// HerdImport - core/validator.rs
//
// Row validation: required fields, series whitelist, sex mapping and
// calendar dates. Produces the checked core of a record; costs are
// attached afterwards by the importer.
// Core layer: pure logic, "today" is passed in.

use crate::core::date;
use crate::core::model::{MappedFields, Sex};
use crate::util::constants::SUPPORTED_SERIES;
use crate::util::error::RowError;
use chrono::NaiveDate;

/// Fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedFields {
    pub series: String,
    pub registry: String,
    pub breed: String,
    pub sex: Sex,
    pub birth_date: NaiveDate,
    pub age_months: u32,
}

/// Breed implied by a supported series, or `None` if the series is not
/// accepted.
pub fn breed_for_series(series: &str) -> Option<&'static str> {
    SUPPORTED_SERIES
        .iter()
        .find(|(code, _)| code.eq_ignore_ascii_case(series))
        .map(|(_, breed)| *breed)
}

/// Validate mapped fields for one row.
///
/// Checks run in order: required fields, series, sex, date shape, calendar
/// date. The first failure is returned.
pub fn validate(
    fields: &MappedFields,
    today: NaiveDate,
    century_window_years: u32,
) -> Result<ValidatedFields, RowError> {
    let series = fields.series.trim();
    let registry = fields.registry.trim();
    let birth = fields.birth.trim();
    let sex_raw = fields.sex.trim();

    for (name, value) in [
        ("series", series),
        ("registry", registry),
        ("birth date", birth),
        ("sex", sex_raw),
    ] {
        if value.is_empty() {
            return Err(RowError::MissingRequiredField { field: name });
        }
    }

    let breed = breed_for_series(series).ok_or_else(|| RowError::UnsupportedSeries {
        series: series.to_string(),
    })?;

    let sex = Sex::parse(sex_raw).ok_or_else(|| RowError::InvalidSex {
        raw: sex_raw.to_string(),
    })?;

    let normalized = date::normalize_date(birth, today, century_window_years)?;
    let birth_date = date::parse_canonical(&normalized)?;

    let age_months = fields
        .age
        .as_deref()
        .and_then(|a| a.trim().parse::<u32>().ok())
        .unwrap_or_else(|| date::age_in_months(birth_date, today));

    Ok(ValidatedFields {
        series: series.to_uppercase(),
        registry: registry.to_string(),
        breed: breed.to_string(),
        sex,
        birth_date,
        age_months,
    })
}
