//! Error types for the data-loader crate.
//!
//! Every failure while reading the MovieLens CSV files ends up as one of
//! these variants. Callers higher up the stack treat any of them as "the
//! catalog could not be loaded", which is fatal at startup.

use thiserror::Error;

/// Errors that can occur during data loading and parsing
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A CSV row couldn't be decoded into its record type
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: u64,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same movie id appears on more than one row of movies.csv
    #[error("Duplicate movie id {id} in catalog")]
    DuplicateMovieId { id: u32 },

    /// Referenced entity doesn't exist (e.g., rating for non-existent movie)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: u32 },
}

impl DataLoadError {
    /// Wrap a `csv::Error` with the file it came from.
    pub(crate) fn from_csv(file: &str, err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        let reason = err.to_string();
        match err.into_kind() {
            csv::ErrorKind::Io(io) => DataLoadError::IoError(io),
            _ => DataLoadError::ParseError {
                file: file.to_string(),
                line,
                reason,
            },
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
