use thiserror::Error;

/// Structured error for the CSV import path. Raised on the first invalid
/// row and fatal for the whole file; the message is what the upload UI
/// shows the user, hence Swedish. `row` is the 1-based line number in
/// the uploaded file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CsvImportError {
    #[error("Rad {row}: kolumnen '{field}' saknar värde")]
    MissingField { row: u64, field: &'static str },

    #[error("Rad {row}: år måste vara ett heltal, fick '{value}'")]
    InvalidYear { row: u64, value: String },

    #[error("Rad {row}: vecka måste vara ett heltal, fick '{value}'")]
    InvalidWeek { row: u64, value: String },

    #[error("Rad {row}: vecka måste vara mellan 1 och 53, fick {week}")]
    WeekOutOfRange { row: u64, week: i64 },

    #[error("Rad {row}: okänd veckodag '{value}'")]
    UnknownWeekday { row: u64, value: String },

    #[error("Ogiltig CSV-fil: {0}")]
    Malformed(String),
}
