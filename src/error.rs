//! Error types for loading, cleaning and exporting datasets.
//!
//! Everything in the data layer returns [`SweepError`]; the UI turns it into
//! a message next to the affected file and carries on with the next one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SweepError {
    /// Extension other than `.csv` / `.xlsx`. Holds the lowercase extension
    /// including its dot, or an empty string when there is none.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("No columns to parse from file")]
    EmptyFile,

    #[error("Spreadsheet contains no worksheet")]
    NoWorksheet,

    #[error("Row {row} has {found} fields, expected at most {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write CSV: {0}")]
    CsvWrite(String),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::XlsxError),

    #[error("Failed to write spreadsheet: {0}")]
    SpreadsheetWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("Too many columns for a worksheet: {0}")]
    TooManyColumns(usize),

    #[error("Too many rows for a worksheet: {0}")]
    TooManyRows(usize),

    #[error("Not enough numerical columns for visualization.")]
    NotEnoughNumericColumns { found: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SweepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_type_message_names_extension() {
        let err = SweepError::UnsupportedFileType(".txt".into());
        assert_eq!(err.to_string(), "Unsupported file type: .txt");
    }

    #[test]
    fn numeric_column_warning_is_user_facing() {
        let err = SweepError::NotEnoughNumericColumns { found: 1 };
        assert_eq!(
            err.to_string(),
            "Not enough numerical columns for visualization."
        );
    }
}
