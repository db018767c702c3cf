//! Error types for roster loading, family building and reconciliation.

use thiserror::Error;

/// Failure to fold one person record into another.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MergeError {
    /// The two records do not describe the same person.
    #[error("attempting to update \"{target}\" from \"{incoming}\"")]
    IdentityMismatch { target: String, incoming: String },

    /// Both records carry different values for a field that may not conflict.
    #[error("update conflict {field}: this={this:?}, other={other:?}")]
    FieldConflict {
        field: &'static str,
        this: String,
        other: String,
    },
}

/// A spreadsheet row that does not fit its schema. Never fatal: callers skip it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed row: {0}")]
pub struct MalformedRow(pub String);

/// Errors raised while loading sources or building families.
#[derive(Error, Debug)]
pub enum RosterError {
    /// A merge failed while processing a specific source row.
    #[error("{sheet} row {line}: {source}")]
    Merge {
        sheet: &'static str,
        line: usize,
        #[source]
        source: MergeError,
    },

    /// The workbook could not be opened or a sheet could not be decoded.
    #[error("workbook {path}: {message}")]
    Workbook { path: String, message: String },

    /// A required sheet is absent from the workbook.
    #[error("sheet '{0}' not found in workbook")]
    MissingSheet(String),

    /// A required column header is absent from a CSV export.
    #[error("column '{column}' not found in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RosterResult<T> = std::result::Result<T, RosterError>;
