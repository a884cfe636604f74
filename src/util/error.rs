// HerdImport - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Row-level errors never escape the batch; they are folded into the
// import summary. Everything else converts into `HerdImportError`.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all HerdImport operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum HerdImportError {
    /// The whole batch was rejected before any row was processed.
    Batch(BatchError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),

    /// I/O error with path context.
    Io {
        path: PathBuf,
        operation: &'static str,
        source: io::Error,
    },
}

impl fmt::Display for HerdImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Batch(e) => write!(f, "Import rejected: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
            Self::Io {
                path,
                operation,
                source,
            } => write!(
                f,
                "I/O error during {operation} on '{}': {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for HerdImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Batch(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::Io { source, .. } => Some(source),
        }
    }
}

// ---------------------------------------------------------------------------
// Row errors
// ---------------------------------------------------------------------------

/// Why a single input row could not become an animal record.
///
/// Fatal to the row only; the batch carries on with the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    /// Date text has the wrong shape or out-of-range components.
    InvalidDateFormat { raw: String },

    /// Wrong token count for a strict delimiter mode.
    MalformedLine { expected: usize, found: usize },

    /// Too few tokens for a spreadsheet row.
    InsufficientFields { minimum: usize, found: usize },

    /// No token containing `/` in a spreadsheet row.
    DateNotFound,

    /// Series code outside the accepted whitelist.
    UnsupportedSeries { series: String },

    /// Sex token not in the recognised mapping.
    InvalidSex { raw: String },

    /// Date is well-formed but not a real calendar day.
    InvalidDate { normalized: String },

    /// A required field is empty after mapping.
    MissingRequiredField { field: &'static str },
}

impl RowError {
    /// Stable machine-readable code for reports and exports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidDateFormat { .. } => "InvalidDateFormat",
            Self::MalformedLine { .. } => "MalformedLine",
            Self::InsufficientFields { .. } => "InsufficientFields",
            Self::DateNotFound => "DateNotFound",
            Self::UnsupportedSeries { .. } => "UnsupportedSeries",
            Self::InvalidSex { .. } => "InvalidSex",
            Self::InvalidDate { .. } => "InvalidDate",
            Self::MissingRequiredField { .. } => "MissingRequiredField",
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDateFormat { raw } => {
                write!(f, "invalid date '{raw}': expected DD/MM/YY, DD/MM/YYYY or YYYY-MM-DD")
            }
            Self::MalformedLine { expected, found } => write!(
                f,
                "expected exactly {expected} '|'-separated fields, found {found}"
            ),
            Self::InsufficientFields { minimum, found } => write!(
                f,
                "insufficient fields: need at least {minimum}, found {found}"
            ),
            Self::DateNotFound => write!(f, "birth date not found (no field contains '/')"),
            Self::UnsupportedSeries { series } => {
                write!(f, "series '{series}' is not supported by this import")
            }
            Self::InvalidSex { raw } => {
                write!(f, "sex '{raw}' not recognised (expected M, F, Macho or Fêmea)")
            }
            Self::InvalidDate { normalized } => {
                write!(f, "'{normalized}' is not a valid calendar date")
            }
            Self::MissingRequiredField { field } => {
                write!(f, "required field '{field}' is empty")
            }
        }
    }
}

impl std::error::Error for RowError {}

// ---------------------------------------------------------------------------
// Batch errors
// ---------------------------------------------------------------------------

/// Errors that reject an entire batch before any row is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    /// The CSV header row does not name every required column.
    InvalidCsvHeader {
        line_number: usize,
        header: String,
        missing: Vec<String>,
    },

    /// The batch holds more data lines than the configured maximum.
    TooManyLines { count: usize, max: usize },
}

impl BatchError {
    /// Stable machine-readable code for reports and exports.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCsvHeader { .. } => "InvalidCsvHeader",
            Self::TooManyLines { .. } => "TooManyLines",
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCsvHeader { missing, .. } => write!(
                f,
                "CSV header is missing required column(s): {}",
                missing.join(", ")
            ),
            Self::TooManyLines { count, max } => write!(
                f,
                "batch has {count} data lines, exceeds maximum of {max}. \
                 Split the input or raise [import] max_lines in config."
            ),
        }
    }
}

impl std::error::Error for BatchError {}

impl From<BatchError> for HerdImportError {
    fn from(e: BatchError) -> Self {
        Self::Batch(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

impl From<ExportError> for HerdImportError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for HerdImportError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for HerdImport results.
pub type Result<T> = std::result::Result<T, HerdImportError>;
