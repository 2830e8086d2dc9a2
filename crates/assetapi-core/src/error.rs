//! Error types for AssetAPI
//!
//! Each layer has its own error enum. Client-facing ones convert into
//! [`ApiError`], which renders the JSON error body. Registry configuration
//! errors never reach a client: they stop startup.

use crate::handler::Operation;
use crate::service::ServiceError;
use assetapi_openapi::versioning::{ApiVersion, MalformedVersion};
use bytes::Bytes;
use http::{header, HeaderValue, StatusCode};
use http_body_util::Full;
use serde::Serialize;
use std::fmt;

/// Result type alias for AssetAPI operations
pub type Result<T, E = ApiError> = std::result::Result<T, E>;

/// Why no version could be settled on for a request
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolutionError {
    /// A version token was supplied but does not parse
    #[error(transparent)]
    MalformedVersion(#[from] MalformedVersion),

    /// No version signal and the default may not be assumed
    #[error("an API version is required but none was specified")]
    VersionRequired,

    /// Well-formed version with no registry entry
    #[error("API version {requested} is not supported; supported versions: {}", join_versions(.supported))]
    UnsupportedVersion {
        requested: ApiVersion,
        supported: Vec<ApiVersion>,
    },
}

/// Field-level decode failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Wire name of the field in the caller's API version
    pub field: String,
    /// Error code (e.g., "required", "type", "enum", "range", "date")
    pub code: String,
    /// Human-readable message
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// A request body that violates its version's shape or the domain invariants
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    /// The body is not a JSON document of the expected shape
    #[error("invalid request body: {0}")]
    Body(String),

    /// One or more fields hold invalid values
    #[error("request validation failed: {}", describe_fields(.0))]
    Fields(Vec<FieldError>),
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::Body(err.to_string())
    }
}

/// Failure while dispatching a resolved request
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No registry entry for the version
    #[error("no registry entry for API version {0}")]
    UnknownVersion(ApiVersion),

    /// The version's entry has no handler for the operation
    #[error("API version {version} does not implement {operation}")]
    UnknownOperation {
        version: ApiVersion,
        operation: Operation,
    },

    /// The operation needs a request mapper the version does not have
    #[error("no request mapper available for operation {0}")]
    MissingDecoder(Operation),

    /// The request body did not decode
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// The asset service failed
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The response DTO could not be serialized
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Invalid registry declaration, found while building it at startup
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryConfigurationError {
    /// No version was declared
    #[error("no API versions declared")]
    Empty,

    /// The same version was declared twice
    #[error("API version {0} declared more than once")]
    DuplicateVersion(ApiVersion),

    /// A declared operation has no handler for a version
    #[error("API version {version} has no handler for operation {operation}")]
    MissingHandler {
        version: ApiVersion,
        operation: Operation,
    },

    /// A version declares a body-carrying operation but no request mapper
    #[error("API version {version} has no request mapper for operation {operation}")]
    MissingRequestMapper {
        version: ApiVersion,
        operation: Operation,
    },

    /// A version has no response mapper
    #[error("API version {0} has no response mapper")]
    MissingResponseMapper(ApiVersion),

    /// The default version is not one of the declared versions
    #[error("default API version {0} is not registered")]
    DefaultVersionNotRegistered(ApiVersion),
}

/// Failure assembling a [`VersionedApi`](crate::api::VersionedApi)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiBuildError {
    /// The registry or the resolver's default version is inconsistent
    #[error(transparent)]
    Registry(#[from] RegistryConfigurationError),

    /// A documentation path collides with the asset route or another document
    #[error("invalid route: {0}")]
    Route(String),
}

impl From<matchit::InsertError> for ApiBuildError {
    fn from(err: matchit::InsertError) -> Self {
        ApiBuildError::Route(err.to_string())
    }
}

fn join_versions(versions: &[ApiVersion]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn describe_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Standard API error type
///
/// Provides structured error responses following a consistent JSON format.
#[derive(Debug, Clone)]
pub struct ApiError {
    /// HTTP status code
    pub status: StatusCode,
    /// Error type identifier
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level validation errors
    pub fields: Option<Vec<FieldError>>,
    /// Internal details (logged, never rendered)
    pub(crate) internal: Option<String>,
    /// `Allow` header value for 405 responses
    pub(crate) allow: Option<String>,
}

impl ApiError {
    /// Create a new API error
    pub fn new(
        status: StatusCode,
        error_type: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            status,
            error_type: error_type.into(),
            message: message.into(),
            fields: None,
            internal: None,
            allow: None,
        }
    }

    /// Create a validation error with field details
    pub fn validation(fields: Vec<FieldError>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            error_type: "validation_error".to_string(),
            message: "Request validation failed".to_string(),
            fields: Some(fields),
            internal: None,
            allow: None,
        }
    }

    /// Create a 400 Bad Request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }

    /// Create a 404 Not Found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// Create a 405 Method Not Allowed error
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed", message)
    }

    /// Create a 409 Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, "conflict", message)
    }

    /// Create a 500 Internal Server Error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }

    /// Add internal details (for logging, hidden from the response)
    pub fn with_internal(mut self, details: impl Into<String>) -> Self {
        self.internal = Some(details.into());
        self
    }

    /// Set the methods a 405 response advertises
    pub fn with_allow(mut self, methods: impl Into<String>) -> Self {
        self.allow = Some(methods.into());
        self
    }

    /// Internal details, if any
    pub fn internal_details(&self) -> Option<&str> {
        self.internal.as_deref()
    }

    /// Render as a JSON HTTP response
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let status = self.status;
        let allow = self.allow.clone();
        let body = serde_json::to_vec(&ErrorResponse::from(self))
            .unwrap_or_else(|_| br#"{"error":{"type":"internal_error","message":"error"}}"#.to_vec());

        let mut response = http::Response::new(Full::new(Bytes::from(body)));
        *response.status_mut() = status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        if let Some(value) = allow.and_then(|methods| HeaderValue::from_str(&methods).ok()) {
            response.headers_mut().insert(header::ALLOW, value);
        }
        response
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.error_type, self.message)
    }
}

impl std::error::Error for ApiError {}

/// JSON representation of API error response
#[derive(Serialize)]
pub(crate) struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldError>>,
}

impl From<ApiError> for ErrorResponse {
    fn from(err: ApiError) -> Self {
        Self {
            error: ErrorBody {
                error_type: err.error_type,
                message: err.message,
                fields: err.fields,
            },
        }
    }
}

impl From<ResolutionError> for ApiError {
    fn from(err: ResolutionError) -> Self {
        let error_type = match &err {
            ResolutionError::MalformedVersion(_) => "malformed_api_version",
            ResolutionError::VersionRequired => "api_version_required",
            ResolutionError::UnsupportedVersion { .. } => "unsupported_api_version",
        };
        ApiError::new(StatusCode::BAD_REQUEST, error_type, err.to_string())
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        match err {
            DecodeError::Body(message) => ApiError::bad_request(format!("Invalid JSON: {}", message)),
            DecodeError::Fields(fields) => ApiError::validation(fields),
        }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound(_) => ApiError::not_found(err.to_string()),
            ServiceError::Rejected { .. } => ApiError::conflict(err.to_string()),
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::Decode(err) => err.into(),
            DispatchError::Service(err) => err.into(),
            other => ApiError::internal("An internal error occurred").with_internal(other.to_string()),
        }
    }
}
