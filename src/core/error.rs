use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MergeError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Arrow error: {0}")]
    ArrowError(String),
    #[error("Table error: {0}")]
    TableError(String),
    #[error("Export error: {0}")]
    ExportError(String),
    #[error("No valid CSV files uploaded.")]
    NoValidInput,
    #[error("Please enter an MPAN.")]
    EmptyQuery,
    #[error("No data found for MPAN: {0}")]
    NoMatch(String),
    #[error("Action '{action}' is not allowed in phase '{phase}'")]
    InvalidAction { phase: String, action: String },
    #[error("Session is finished, start a new one to continue")]
    SessionFinished,
    #[error("Session '{0}' not found")]
    SessionNotFound(String),
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for MergeError {
    fn from(err: arrow::error::ArrowError) -> Self {
        MergeError::ArrowError(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for MergeError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        MergeError::ExportError(err.to_string())
    }
}
