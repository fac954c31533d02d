//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

/// Input binding error
///
/// Returned when a `(qualified name, raw value)` pair cannot be applied to the
/// form state. The store is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum BindError {
    /// Name is not of the form `group.property`
    #[error("Malformed field name: {0}")]
    MalformedName(String),

    /// Group is not part of this form
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Property is not a key of its group
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Raw value does not convert to the declared field type
    #[error("Type mismatch for {field}: expected {expected}, got {raw:?}")]
    TypeMismatch {
        field: String,
        expected: String,
        raw: String,
    },
}

/// Reason a submission did not start
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum Blocked {
    /// At least one field fails validation
    #[error("Form has invalid fields: {}", .fields.join(", "))]
    Invalid { fields: Vec<String> },

    /// Another submission is still outstanding
    #[error("A submission is already in progress")]
    InFlight,
}

/// Rejection from the rules service
///
/// Carries the HTTP-like status and the raw response body. The display form
/// `"<status>: <response>"` is what the alert banner shows.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{status}: {response}")]
pub struct RulesServiceError {
    pub status: u16,
    pub response: String,
}

impl RulesServiceError {
    #[must_use]
    pub fn new(status: u16, response: impl Into<String>) -> Self {
        Self {
            status,
            response: response.into(),
        }
    }

    /// Client-side rejection (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status)
    }
}

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Input binding failed
    #[error("{0}")]
    Bind(#[from] BindError),

    /// Submission gate refused
    #[error("Submission blocked: {0}")]
    Blocked(#[from] Blocked),

    /// Rules service rejected the call
    #[error("Rules service error: {0}")]
    RulesService(#[from] RulesServiceError),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Storage layer error
    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    /// Whether it is expected behavior (user input, blocked submit, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Bind(_) | Self::Blocked(_) | Self::ValidationError(_) => true,
            Self::RulesService(e) => e.is_client_error(),
            Self::SerializationError(_) | Self::StorageError(_) => false,
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::SerializationError(e.to_string())
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_service_error_display_is_status_colon_response() {
        let err = RulesServiceError::new(500, "boom");
        assert_eq!(err.to_string(), "500: boom");
    }

    #[test]
    fn expected_classification() {
        assert!(CoreError::from(BindError::UnknownGroup("x".into())).is_expected());
        assert!(CoreError::from(Blocked::InFlight).is_expected());
        assert!(CoreError::from(RulesServiceError::new(404, "nope")).is_expected());
        assert!(!CoreError::from(RulesServiceError::new(503, "down")).is_expected());
        assert!(!CoreError::StorageError("disk full".into()).is_expected());
    }

    #[test]
    fn serializes_with_code_tag() {
        let err = CoreError::from(BindError::UnknownField("driver.height".into()));
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "Bind");
        assert_eq!(json["details"]["code"], "UnknownField");
        assert_eq!(json["details"]["details"], "driver.height");
    }
}
