//! Unified error handling for checkout operations.
//!
//! Every fallible operation returns `Result<T, CheckoutError>`, so the
//! caller's state transition is driven by an exhaustive match rather than
//! exception shape. The session surfaces at most one error at a time
//! through its single message slot; [`CheckoutError::user_message`] maps
//! each variant to that user-facing text without leaking transport
//! internals.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during checkout orchestration.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// A step-gate requirement or input precondition is unmet.
    #[error("Validation error: {0}")]
    Validation(String),

    /// HTTP request failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing of a service response failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The commerce API reported a failure.
    #[error("Service error: {0}")]
    Service(String),

    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl CheckoutError {
    /// User-facing message for the session's single error slot.
    ///
    /// Validation and service messages are already written for the
    /// customer; transport and parse failures are collapsed to a generic
    /// message and left to tracing for diagnostics.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) | Self::Service(msg) => msg.clone(),
            Self::Http(_) | Self::Parse(_) | Self::Config(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Shorthand for a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type alias for checkout operations.
pub type Result<T> = std::result::Result<T, CheckoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CheckoutError::validation("Please select a shipping method");
        assert_eq!(
            err.to_string(),
            "Validation error: Please select a shipping method"
        );
    }

    #[test]
    fn test_user_message_passes_through_customer_text() {
        let err = CheckoutError::Service("No coverage for this postcode".to_string());
        assert_eq!(err.user_message(), "No coverage for this postcode");

        let err = CheckoutError::validation("Please enter your billing address");
        assert_eq!(err.user_message(), "Please enter your billing address");
    }

    #[test]
    fn test_user_message_hides_transport_internals() {
        let parse_err: serde_json::Error =
            serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = CheckoutError::from(parse_err);
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }
}
