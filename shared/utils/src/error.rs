use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum AirInvError {
    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Calculation error: {field} - {message}")]
    Calculation { field: String, message: String },

    #[error("Unit conversion error: {message}")]
    Conversion { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Reference data error: {message}")]
    ReferenceData { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AirInvError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn calculation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Calculation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion {
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn reference_data(message: impl Into<String>) -> Self {
        Self::ReferenceData {
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Calculation { .. } => "CALCULATION_ERROR",
            Self::Conversion { .. } => "CONVERSION_ERROR",
            Self::BadRequest { .. } => "BAD_REQUEST",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::ReferenceData { .. } => "REFERENCE_DATA_ERROR",
            Self::Serialization { .. } => "SERIALIZATION_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::Calculation { .. } => 422,
            Self::Conversion { .. } => 422,
            Self::BadRequest { .. } => 400,
            Self::Configuration { .. } => 500,
            Self::ReferenceData { .. } => 500,
            Self::Serialization { .. } => 500,
            Self::NotFound { .. } => 404,
            Self::Internal { .. } => 500,
        }
    }

    /// Field path the error is attached to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } | Self::Calculation { field, .. } => Some(field),
            _ => None,
        }
    }
}

pub type AirInvResult<T> = Result<T, AirInvError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<AirInvError> for ErrorResponse {
    fn from(error: AirInvError) -> Self {
        let details = error
            .field()
            .map(|field| serde_json::json!({ "field": field }));
        Self {
            error: error.to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details,
        }
    }
}

// Conversion from common error types
impl From<serde_json::Error> for AirInvError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}

impl From<quick_xml::DeError> for AirInvError {
    fn from(error: quick_xml::DeError) -> Self {
        Self::serialization(error.to_string())
    }
}

impl From<config::ConfigError> for AirInvError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}

impl From<validator::ValidationErrors> for AirInvError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field = errors
            .field_errors()
            .keys()
            .next()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "request".to_string());
        Self::validation(field, crate::validation::format_validation_errors(&errors))
    }
}
