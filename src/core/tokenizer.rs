// HerdImport - core/tokenizer.rs
//
// Splits one raw line into field tokens according to the import mode.
// Spreadsheet rows get delimiter detection, date anchoring, and the
// name-tail heuristic that recovers sire / maternal grandsire names.
// Core layer: pure logic, no I/O.

use crate::core::model::{ImportMode, SheetAnchors, TokenSet};
use crate::util::constants;
use crate::util::error::RowError;
use regex::Regex;
use std::sync::OnceLock;

/// Delimiter detected for a spreadsheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Whitespace,
}

impl Delimiter {
    /// Detection order: tab, then comma, then runs of whitespace.
    pub fn detect(line: &str) -> Self {
        if line.contains('\t') {
            Delimiter::Tab
        } else if line.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        }
    }

    /// Split a line on this delimiter, trimming every token.
    pub fn split(&self, line: &str) -> Vec<String> {
        match self {
            Delimiter::Tab => line.split('\t').map(|t| t.trim().to_string()).collect(),
            Delimiter::Comma => line.split(',').map(|t| t.trim().to_string()).collect(),
            Delimiter::Whitespace => line.split_whitespace().map(str::to_string).collect(),
        }
    }
}

/// Tokenize one line for the given mode.
///
/// CSV lines go through a real CSV reader so quoted fields may hold commas.
pub fn tokenize(line: &str, mode: ImportMode) -> Result<TokenSet, RowError> {
    match mode {
        ImportMode::Csv => Ok(TokenSet {
            fields: split_csv_line(line),
            anchors: None,
        }),
        ImportMode::Manual => tokenize_manual(line),
        ImportMode::Excel => tokenize_sheet(line),
    }
}

/// Split one CSV line into trimmed fields.
///
/// Falls back to a plain comma split if the reader rejects the line
/// (e.g. an unbalanced quote).
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => record.iter().map(str::to_string).collect(),
        Some(Err(e)) => {
            tracing::debug!(error = %e, "CSV reader rejected line; splitting on commas");
            line.split(',').map(|t| t.trim().to_string()).collect()
        }
        None => Vec::new(),
    }
}

fn tokenize_manual(line: &str) -> Result<TokenSet, RowError> {
    let fields: Vec<String> = line.split('|').map(|t| t.trim().to_string()).collect();
    if fields.len() != constants::MANUAL_FIELD_COUNT {
        return Err(RowError::MalformedLine {
            expected: constants::MANUAL_FIELD_COUNT,
            found: fields.len(),
        });
    }
    Ok(TokenSet {
        fields,
        anchors: None,
    })
}

/// Tokenize a spreadsheet row.
///
/// The result is laid out as: every token up to and including the birth
/// date (and the age, when the token after the date is numeric), then the
/// sire name, the maternal grandsire name, and an optional coverage code.
fn tokenize_sheet(line: &str) -> Result<TokenSet, RowError> {
    let delimiter = Delimiter::detect(line);
    let mut tokens = delimiter.split(line);
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }

    if tokens.len() < constants::MIN_SPREADSHEET_FIELDS {
        return Err(RowError::InsufficientFields {
            minimum: constants::MIN_SPREADSHEET_FIELDS,
            found: tokens.len(),
        });
    }

    let date = tokens
        .iter()
        .position(|t| t.contains('/'))
        .ok_or(RowError::DateNotFound)?;

    // Delimited rows keep the age cell after the date even when it is blank
    // or not numeric; only whitespace rows can tell it apart by content.
    let has_age = match delimiter {
        Delimiter::Tab | Delimiter::Comma => true,
        Delimiter::Whitespace => tokens
            .get(date + 1)
            .is_some_and(|t| t.chars().all(|c| c.is_ascii_digit())),
    };
    let names = if has_age { date + 2 } else { date + 1 };

    let tail = tokens.split_off(names.min(tokens.len()));
    let (sire, grandsire, coverage) = match delimiter {
        Delimiter::Whitespace => {
            let (sire, grandsire) = split_name_tail(&tail);
            (sire, grandsire, None)
        }
        Delimiter::Tab | Delimiter::Comma => {
            let mut cells = tail.into_iter();
            (
                cells.next().unwrap_or_default(),
                cells.next().unwrap_or_default(),
                cells.next().filter(|c| !c.is_empty()),
            )
        }
    };

    let mut fields = tokens;
    // Pad so the names always sit at `names`, even if the age was the last token.
    fields.resize(names, String::new());
    fields.push(sire);
    fields.push(grandsire);
    if let Some(code) = coverage {
        fields.push(code);
    }

    tracing::trace!(?delimiter, date, names, fields = fields.len(), "Tokenized sheet row");

    Ok(TokenSet {
        fields,
        anchors: Some(SheetAnchors { date, names }),
    })
}

fn registry_code_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]\d{3,4}$").expect("registry code regex"))
}

fn two_letter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z]{2}$").expect("two-letter code regex"))
}

/// Whether a token can open the maternal grandsire name.
///
/// Matches a short registry code (`B2887`), a two-letter uppercase code, or
/// a preposition such as `DA`/`DOS`.
pub fn is_grandsire_marker(token: &str) -> bool {
    registry_code_re().is_match(token)
        || two_letter_re().is_match(token)
        || constants::NAME_PREPOSITIONS.contains(&token)
}

/// Split a whitespace-separated name tail into (sire, maternal grandsire).
///
/// One or two tokens map directly. With more, the first token after the
/// first position that [`is_grandsire_marker`] accepts starts the grandsire
/// name. Without a marker, the grandsire gets the back half of the tail,
/// capped at [`constants::FALLBACK_GRANDSIRE_TOKENS`] tokens.
///
/// Known failure modes: a sire name with an internal two-letter word
/// (e.g. `"REM TE GEN"`) splits early, and a grandsire name without any
/// marker longer than the cap loses its first tokens to the sire.
pub fn split_name_tail(tail: &[String]) -> (String, String) {
    match tail.len() {
        0 => (String::new(), String::new()),
        1 => (tail[0].clone(), String::new()),
        2 => (tail[0].clone(), tail[1].clone()),
        len => {
            let split = (1..len)
                .find(|&i| is_grandsire_marker(&tail[i]))
                .unwrap_or_else(|| {
                    let grandsire_len = (len - len / 2).min(constants::FALLBACK_GRANDSIRE_TOKENS);
                    len - grandsire_len
                });
            (tail[..split].join(" "), tail[split..].join(" "))
        }
    }
}
