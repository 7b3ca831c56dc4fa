//! Error types for SCIM response shaping.
//!
//! Errors fall into two groups: client errors raised while interpreting
//! request input (attribute paths in query parameters or patch operations),
//! and configuration errors raised while registering resource types at
//! startup. Trimming itself never fails.

/// Errors raised while parsing or manipulating attribute paths.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// The path text does not follow the SCIM attribute path grammar
    #[error("Malformed attribute path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// A sub-path was requested past the end of the path
    #[error("Sub-path index {index} is out of range for a path of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
}

/// Main error type for SCIM response shaping operations.
#[derive(Debug, thiserror::Error)]
pub enum ScimError {
    /// An entry of the `attributes` or `excludedAttributes` query parameter
    /// could not be parsed
    #[error("'{value}' is not a valid value for the {parameter} parameter: {source}")]
    InvalidAttributeParameter {
        parameter: String,
        value: String,
        #[source]
        source: PathError,
    },

    /// An attribute path supplied elsewhere in a request could not be parsed
    #[error("Invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// A resource type definition is incomplete or conflicts with another one
    #[error("Invalid resource type definition: {message}")]
    InvalidDefinition { message: String },

    /// Unsupported resource type
    #[error("Unsupported resource type: {0}")]
    UnsupportedResourceType(String),

    /// Invalid request format or parameters
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors
    #[error("Internal server error: {message}")]
    Internal { message: String },
}

// Convenience methods for creating common errors
impl ScimError {
    /// Create an attribute parameter error
    pub fn invalid_attribute_parameter(
        parameter: impl Into<String>,
        value: impl Into<String>,
        source: PathError,
    ) -> Self {
        Self::InvalidAttributeParameter {
            parameter: parameter.into(),
            value: value.into(),
            source,
        }
    }

    /// Create an invalid definition error
    pub fn invalid_definition(message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status code for the error response (RFC 7644 Section 3.12).
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAttributeParameter { .. }
            | Self::InvalidPath(_)
            | Self::InvalidRequest { .. }
            | Self::Json(_) => 400,
            Self::UnsupportedResourceType(_) => 404,
            Self::InvalidDefinition { .. } | Self::Internal { .. } => 500,
        }
    }

    /// The `scimType` detail for 400 responses, if any.
    pub fn scim_type(&self) -> Option<&'static str> {
        match self {
            Self::InvalidAttributeParameter { .. } => Some("invalidValue"),
            Self::InvalidPath(_) => Some("invalidPath"),
            Self::InvalidRequest { .. } | Self::Json(_) => Some("invalidSyntax"),
            _ => None,
        }
    }

    /// Whether the error was caused by the client rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl PathError {
    /// Create a malformed path error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

// Result type aliases for convenience
pub type ScimResult<T> = Result<T, ScimError>;
pub type PathResult<T> = Result<T, PathError>;
