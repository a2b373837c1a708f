//! Query engine errors
//!
//! Filter-level problems (bad regex, unparseable numeric value) are never
//! errors: they disable only the offending filter term. The only failure an
//! engine operation reports is a missing column.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Stats or distinct-values requested for a column the table lacks
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),
}

impl EngineError {
    /// Machine-readable error label
    pub fn error_type(&self) -> &'static str {
        match self {
            EngineError::ColumnNotFound(_) => "ColumnNotFound",
        }
    }
}
