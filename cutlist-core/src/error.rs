//! Error types for cut-list optimization.

use thiserror::Error;

/// Error codes for cut-list processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Non-positive or otherwise unusable dimension (E100)
    InvalidDimension = 100,
    /// Quantity of zero (E101)
    InvalidQuantity = 101,
    /// Negative or non-finite cost (E102)
    InvalidCost = 102,
    /// Unparseable option value (E103)
    InvalidValue = 103,
    /// Catalog entry not found (E200)
    NotFound = 200,
    /// Project snapshot version not recognized (E300)
    UnsupportedVersion = 300,
    /// Snapshot could not be read or written (E301)
    Snapshot = 301,
}

/// Main error type for the optimizer.
#[derive(Debug, Error)]
pub enum CutlistError {
    #[error("Invalid {field}: expected a positive size in mm, got {value}")]
    InvalidDimension { field: &'static str, value: i64 },

    #[error("Invalid quantity: expected at least 1, got {value}")]
    InvalidQuantity { value: u32 },

    #[error("Invalid sheet cost: {value}")]
    InvalidCost { value: f64 },

    #[error("Invalid value for '{field}': expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        expected: String,
        value: String,
    },

    #[error("Part not found: id={id}")]
    PartNotFound { id: u64 },

    #[error("Sheet not found: id={id}")]
    SheetNotFound { id: String },

    #[error("Unsupported project version '{version}'")]
    UnsupportedVersion { version: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CutlistError {
    /// Get the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            CutlistError::InvalidDimension { .. } => ErrorCode::InvalidDimension,
            CutlistError::InvalidQuantity { .. } => ErrorCode::InvalidQuantity,
            CutlistError::InvalidCost { .. } => ErrorCode::InvalidCost,
            CutlistError::InvalidValue { .. } => ErrorCode::InvalidValue,
            CutlistError::PartNotFound { .. } => ErrorCode::NotFound,
            CutlistError::SheetNotFound { .. } => ErrorCode::NotFound,
            CutlistError::UnsupportedVersion { .. } => ErrorCode::UnsupportedVersion,
            CutlistError::Io(_) => ErrorCode::Snapshot,
            CutlistError::Json(_) => ErrorCode::Snapshot,
        }
    }

    /// Get the numeric error code value.
    pub fn code_value(&self) -> i32 {
        self.code() as i32
    }
}

/// Result type alias for optimizer operations.
pub type Result<T> = std::result::Result<T, CutlistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = CutlistError::InvalidDimension {
            field: "width",
            value: 0,
        };
        assert_eq!(err.code(), ErrorCode::InvalidDimension);
        assert_eq!(err.code_value(), 100);

        let err = CutlistError::UnsupportedVersion {
            version: "0.9".into(),
        };
        assert_eq!(err.code_value(), 300);
    }

    #[test]
    fn test_error_messages() {
        let err = CutlistError::InvalidDimension {
            field: "height",
            value: -5,
        };
        assert_eq!(
            err.to_string(),
            "Invalid height: expected a positive size in mm, got -5"
        );

        let err = CutlistError::UnsupportedVersion {
            version: "0.9".into(),
        };
        assert_eq!(err.to_string(), "Unsupported project version '0.9'");
    }
}
