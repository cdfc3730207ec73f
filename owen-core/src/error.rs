/// Structured error types for owen-core.
///
/// Uses `thiserror` so the store crate can compose these into its own
/// error type. The `owenctl` binary wraps everything in `anyhow`.
use thiserror::Error;

/// Main error type for owen-core operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OwenError {
    /// A string did not name any variant of an enumerated field
    #[error("Invalid {field} value '{value}'")]
    InvalidVariant { field: &'static str, value: String },

    /// Stored date string could not be parsed
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Required field missing
    #[error("Missing required field '{field}' in {context}")]
    MissingField { field: String, context: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for owen-core operations
pub type Result<T> = std::result::Result<T, OwenError>;

impl OwenError {
    /// Create an invalid variant error
    pub fn invalid_variant(field: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidVariant {
            field,
            value: value.into(),
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>, context: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OwenError::missing_field("target_employee", "WE response");
        assert_eq!(
            err.to_string(),
            "Missing required field 'target_employee' in WE response"
        );

        let err = OwenError::invalid_variant("initiative category", "Squad");
        assert_eq!(err.to_string(), "Invalid initiative category value 'Squad'");
    }

    #[test]
    fn test_invalid_date_mentions_value() {
        let err = OwenError::invalid_date("31/02/2016", "day out of range");
        assert!(err.to_string().contains("31/02/2016"));
        assert!(err.to_string().contains("day out of range"));
    }
}
