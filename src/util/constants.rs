// HerdImport - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "HerdImport";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "HerdImport";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Registry rules
// =============================================================================

/// Series codes accepted end-to-end, paired with the breed they imply.
///
/// Breed is never read from input; it follows from the series.
pub const SUPPORTED_SERIES: &[(&str, &str)] = &[("CJCJ", "Nelore")];

// =============================================================================
// Tokenizer limits
// =============================================================================

/// Minimum number of tokens a spreadsheet row must split into.
pub const MIN_SPREADSHEET_FIELDS: usize = 7;

/// Exact number of pipe-delimited tokens in a manual-entry line.
pub const MANUAL_FIELD_COUNT: usize = 6;

/// Number of tokens in the full spreadsheet prefix that ends at the birth date
/// (series, registry, lot, location, weight, circumference, sex, index, deca,
/// mgte, top score). When the date sits at this index the numeric metrics
/// columns are extracted as well.
pub const FULL_SHEET_DATE_INDEX: usize = 11;

/// Sex column of the full spreadsheet layout.
pub const FULL_SHEET_SEX_INDEX: usize = 6;

/// Upper bound on grandsire-name tokens when no delimiter token is found.
pub const FALLBACK_GRANDSIRE_TOKENS: usize = 3;

/// Short tokens that commonly open a maternal-grandsire name
/// ("B2887 DA S.NICE", "DA MATA", ...).
pub const NAME_PREPOSITIONS: &[&str] = &["DA", "DE", "DO", "DAS", "DOS"];

/// Lowercase token prefixes that mark a spreadsheet header row.
pub const HEADER_KEYWORDS: &[&str] = &["serie", "rg", "nasc"];

// =============================================================================
// CSV columns
// =============================================================================

/// Columns every CSV header must name (case-insensitive, any order).
pub const CSV_REQUIRED_COLUMNS: &[&str] = &["Serie", "RGN", "Nascimento", "Pai", "AvoMaterno", "Sexo"];

/// Optional CSV column carrying the age in months.
pub const CSV_AGE_COLUMN: &str = "Idade";

/// Optional CSV column carrying the coverage-type code.
pub const CSV_COVERAGE_COLUMN: &str = "Cobertura";

// =============================================================================
// Dates
// =============================================================================

/// Default look-ahead for two-digit years: a year more than this many years
/// past the current two-digit year is placed in the previous century.
pub const DEFAULT_CENTURY_WINDOW_YEARS: u32 = 10;

/// Largest accepted century window.
pub const MAX_CENTURY_WINDOW_YEARS: u32 = 99;

/// Average month length used when deriving an age from a birth date.
pub const AVERAGE_DAYS_PER_MONTH: f64 = 30.44;

// =============================================================================
// Cost schedule (flat fees, in cents)
// =============================================================================

/// DNA paternity test fee.
pub const DNA_PATERNITY_FEE_CENTS: i64 = 5_000;

/// DNA genomic panel fee.
pub const DNA_GENOMIC_FEE_CENTS: i64 = 8_000;

// =============================================================================
// Batch limits
// =============================================================================

/// Default maximum number of data lines accepted in one batch.
pub const DEFAULT_MAX_IMPORT_LINES: usize = 10_000;

/// Minimum sensible value for the max-lines limit.
pub const MIN_MAX_IMPORT_LINES: usize = 1;

/// Hard upper bound on max lines (prevents configuration mistakes).
pub const ABSOLUTE_MAX_IMPORT_LINES: usize = 100_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of an input line included in log output.
pub const DEBUG_MAX_LINE_PREVIEW: usize = 200;

/// Raw-text width of an error line in the terminal report.
pub const REPORT_RAW_TEXT_WIDTH: usize = 80;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
