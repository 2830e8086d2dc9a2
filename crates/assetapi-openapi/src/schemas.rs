//! Error schemas for OpenAPI documentation
//!
//! These mirror the JSON error bodies produced by `assetapi-core`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorSchema {
    /// The error details
    pub error: ErrorBodySchema,
}

/// Error body details
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBodySchema {
    /// Error type identifier (e.g., "unsupported_api_version", "not_found")
    #[serde(rename = "type")]
    pub error_type: String,
    /// Human-readable error message
    pub message: String,
    /// Field-level errors (for request body validation)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldErrorSchema>>,
}

/// Field-level validation error
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorSchema {
    /// Wire name of the offending field (e.g. "totalValue")
    pub field: String,
    /// Error code (e.g., "required", "type", "enum", "date")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ErrorSchema {
    /// Sample unsupported version error
    pub fn unsupported_version_example() -> Self {
        Self {
            error: ErrorBodySchema {
                error_type: "unsupported_api_version".to_string(),
                message: "API version 3.0 is not supported; supported versions: 1.0, 2.0"
                    .to_string(),
                fields: None,
            },
        }
    }

    /// Sample validation error
    pub fn validation_example() -> Self {
        Self {
            error: ErrorBodySchema {
                error_type: "validation_error".to_string(),
                message: "Request validation failed".to_string(),
                fields: Some(vec![FieldErrorSchema {
                    field: "status".to_string(),
                    code: "enum".to_string(),
                    message: "unknown asset status \"Lost\"".to_string(),
                }]),
            },
        }
    }
}
