//! # Audit Error Types Module
//!
//! Errors raised at the edges of an audit run. The checks themselves never
//! fail; configuration, storage and report output can.

/// Custom error types for audit runs
#[derive(Debug, Clone, PartialEq)]
pub enum AuditError {
    /// Invalid thresholds or missing recipe source
    Config(String),
    /// Recipe records could not be fetched or decoded
    Storage(String),
    /// The report file could not be written
    Report(String),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditError::Config(msg) => write!(f, "Configuration error: {msg}"),
            AuditError::Storage(msg) => write!(f, "Storage error: {msg}"),
            AuditError::Report(msg) => write!(f, "Report error: {msg}"),
        }
    }
}

impl std::error::Error for AuditError {}

impl From<csv::Error> for AuditError {
    fn from(err: csv::Error) -> Self {
        AuditError::Report(err.to_string())
    }
}

impl From<serde_json::Error> for AuditError {
    fn from(err: serde_json::Error) -> Self {
        AuditError::Storage(err.to_string())
    }
}
