//! Error types for OWS request admission.

use thiserror::Error;

/// Result type alias using OwsError.
pub type OwsResult<T> = Result<T, OwsError>;

/// Who is responsible for an admission failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The client sent a malformed or unsupported request.
    Client,
    /// The deployment (layer catalog, schema files) is broken.
    Server,
}

/// Primary error type for request admission.
///
/// Every variant carries a `locator` naming the offending parameter or
/// configuration item, as expected by OGC exception reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwsError {
    // === Client Errors ===
    #[error("{message}")]
    MissingParameter { locator: String, message: String },

    #[error("{message}")]
    InvalidParameterValue { locator: String, message: String },

    #[error("xml document isn't valid: {message}")]
    DocumentInvalid { locator: String, message: String },

    // === Deployment Errors ===
    #[error("{message}")]
    Config { locator: String, message: String },

    #[error("schema could not be loaded: {message}")]
    SchemaLoadFailed { locator: String, message: String },
}

impl OwsError {
    pub fn missing_parameter(locator: impl Into<String>, message: impl Into<String>) -> Self {
        OwsError::MissingParameter {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn invalid_parameter(locator: impl Into<String>, message: impl Into<String>) -> Self {
        OwsError::InvalidParameterValue {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn config(locator: impl Into<String>, message: impl Into<String>) -> Self {
        OwsError::Config {
            locator: locator.into(),
            message: message.into(),
        }
    }

    /// The parameter or configuration item the error points at.
    pub fn locator(&self) -> &str {
        match self {
            OwsError::MissingParameter { locator, .. }
            | OwsError::InvalidParameterValue { locator, .. }
            | OwsError::DocumentInvalid { locator, .. }
            | OwsError::Config { locator, .. }
            | OwsError::SchemaLoadFailed { locator, .. } => locator,
        }
    }

    /// Human-readable message without the locator.
    pub fn message(&self) -> &str {
        match self {
            OwsError::MissingParameter { message, .. }
            | OwsError::InvalidParameterValue { message, .. }
            | OwsError::DocumentInvalid { message, .. }
            | OwsError::Config { message, .. }
            | OwsError::SchemaLoadFailed { message, .. } => message,
        }
    }

    /// Short machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            OwsError::MissingParameter { .. } => "MissingParameter",
            OwsError::InvalidParameterValue { .. } => "InvalidParameterValue",
            OwsError::DocumentInvalid { .. } => "DocumentInvalid",
            OwsError::Config { .. } => "ConfigError",
            OwsError::SchemaLoadFailed { .. } => "SchemaLoadFailed",
        }
    }

    /// Get the OGC OWS exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            OwsError::MissingParameter { .. } => "MissingParameterValue",
            OwsError::InvalidParameterValue { .. } | OwsError::DocumentInvalid { .. } => {
                "InvalidParameterValue"
            }
            OwsError::Config { .. } | OwsError::SchemaLoadFailed { .. } => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self.class() {
            ErrorClass::Client => 400,
            ErrorClass::Server => 500,
        }
    }

    /// Configuration defects are operator-facing, everything else is the client's.
    pub fn class(&self) -> ErrorClass {
        match self {
            OwsError::Config { .. } | OwsError::SchemaLoadFailed { .. } => ErrorClass::Server,
            _ => ErrorClass::Client,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exception_codes() {
        assert_eq!(
            OwsError::missing_parameter("SERVICE", "SERVICE is not set").exception_code(),
            "MissingParameterValue"
        );
        assert_eq!(
            OwsError::invalid_parameter("version", "use x.y.z").exception_code(),
            "InvalidParameterValue"
        );
        assert_eq!(
            OwsError::config("config_file", "No layer name defined").exception_code(),
            "NoApplicableCode"
        );
    }

    #[test]
    fn test_config_errors_are_server_class() {
        let err = OwsError::config("config_file", "No layer title defined");
        assert_eq!(err.class(), ErrorClass::Server);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.kind(), "ConfigError");

        let err = OwsError::missing_parameter("VERSION", "VERSION is not set");
        assert_eq!(err.class(), ErrorClass::Client);
        assert_eq!(err.http_status_code(), 400);
    }

    #[test]
    fn test_display_uses_message() {
        let err = OwsError::invalid_parameter("service", "service unknown");
        assert_eq!(err.to_string(), "service unknown");
        assert_eq!(err.locator(), "service");
    }
}
