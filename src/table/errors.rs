//! # Table Store Errors

use thiserror::Error;

/// Result type for table store operations
pub type TableResult<T> = Result<T, TableError>;

/// Table store errors
#[derive(Debug, Clone, Error)]
pub enum TableError {
    /// Backing file missing or unreadable at the configured path
    #[error("Table file unavailable: {0}")]
    FileUnavailable(String),

    /// File exists but does not parse into the expected row/column shape
    #[error("Malformed table: {0}")]
    MalformedTable(String),

    /// Positional operation addressed a row that does not exist
    #[error("Row index {0} out of range")]
    RowOutOfRange(usize),

    /// Encoding or persisting the workbook failed
    #[error("Failed to write table: {0}")]
    WriteFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TableError {
    /// Get HTTP status code
    ///
    /// Every store failure is a server-side condition; none are recovered.
    pub fn status_code(&self) -> u16 {
        500
    }

    /// Stable short name used in log lines
    pub fn kind(&self) -> &'static str {
        match self {
            TableError::FileUnavailable(_) => "file_unavailable",
            TableError::MalformedTable(_) => "malformed_table",
            TableError::RowOutOfRange(_) => "row_out_of_range",
            TableError::WriteFailed(_) => "write_failed",
            TableError::Internal(_) => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_store_errors_are_server_errors() {
        assert_eq!(TableError::FileUnavailable("data.xlsx".into()).status_code(), 500);
        assert_eq!(TableError::MalformedTable("bad zip".into()).status_code(), 500);
        assert_eq!(TableError::RowOutOfRange(9).status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = TableError::FileUnavailable("/tmp/data.xlsx".into());
        assert_eq!(err.to_string(), "Table file unavailable: /tmp/data.xlsx");
        assert_eq!(err.kind(), "file_unavailable");
    }
}
