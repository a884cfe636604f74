// HerdImport - core/date.rs
//
// Regional date normalisation: DD/MM/YY[YY] -> YYYY-MM-DD.
// Core layer: pure logic. "Today" is always passed in.

use crate::util::error::RowError;
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::sync::OnceLock;

fn canonical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("canonical date regex"))
}

/// Normalise a date token to `YYYY-MM-DD`.
///
/// Canonical input is returned unchanged. Slash dates are split into day,
/// month and year; two-digit (or one-digit) years are expanded with
/// [`expand_two_digit_year`]. Day must be 1-31 and month 1-12; calendar
/// validity (e.g. 31/02) is left to the validator.
pub fn normalize_date(
    raw: &str,
    today: NaiveDate,
    century_window_years: u32,
) -> Result<String, RowError> {
    let token = raw.trim();
    let invalid = || RowError::InvalidDateFormat {
        raw: raw.to_string(),
    };

    if canonical_re().is_match(token) {
        return Ok(token.to_string());
    }

    let parts: Vec<&str> = token.split('/').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }
    if parts
        .iter()
        .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(invalid());
    }

    let day: u32 = parts[0].parse().map_err(|_| invalid())?;
    let month: u32 = parts[1].parse().map_err(|_| invalid())?;
    let year_part = parts[2];

    if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
        return Err(invalid());
    }

    let year: i32 = match year_part.len() {
        1 | 2 => {
            let yy: u32 = year_part.parse().map_err(|_| invalid())?;
            expand_two_digit_year(yy, today, century_window_years)
        }
        4 => year_part.parse().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    Ok(format!("{year:04}-{month:02}-{day:02}"))
}

/// Expand a two-digit year relative to `today`.
///
/// Years up to `window` past the current two-digit year stay in the current
/// century; anything later is taken as the previous century
/// (with today in 2026 and window 10: `36` -> 2036, `37` -> 1937).
pub fn expand_two_digit_year(yy: u32, today: NaiveDate, window: u32) -> i32 {
    let current = today.year();
    let current_yy = current.rem_euclid(100) as u32;
    let century = current - current_yy as i32;
    if yy > current_yy + window {
        century - 100 + yy as i32
    } else {
        century + yy as i32
    }
}

/// Parse an already-normalised date into a calendar date.
pub fn parse_canonical(normalized: &str) -> Result<NaiveDate, RowError> {
    NaiveDate::parse_from_str(normalized, "%Y-%m-%d").map_err(|_| RowError::InvalidDate {
        normalized: normalized.to_string(),
    })
}

/// Whole months between `birth` and `today`, using an average month length.
/// Birth dates in the future yield 0.
pub fn age_in_months(birth: NaiveDate, today: NaiveDate) -> u32 {
    use crate::util::constants::AVERAGE_DAYS_PER_MONTH;
    let days = (today - birth).num_days();
    if days <= 0 {
        return 0;
    }
    (days as f64 / AVERAGE_DAYS_PER_MONTH).floor() as u32
}
