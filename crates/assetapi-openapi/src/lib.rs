//! OpenAPI documentation and version primitives for AssetAPI
//!
//! This crate provides the building blocks shared by every API version:
//!
//! - [`versioning`]: version parsing and the ordered reader chain
//! - [`OpenApiSpec`]: one generated document per API version
//! - [`DocumentAnnotator`]: deprecation metadata for retired versions
//!
//! Schemas are derived with `utoipa`, re-exported here as [`Schema`].

mod annotate;
mod config;
mod schemas;
mod spec;
pub mod versioning;

pub use annotate::{
    DocumentAnnotator, VersionDescriptor, DOCUMENT_DEPRECATION_NOTICE,
    OPERATION_DEPRECATION_NOTICE,
};
pub use config::OpenApiConfig;
pub use schemas::{ErrorBodySchema, ErrorSchema, FieldErrorSchema};
pub use spec::{
    ApiInfo, MediaType, OpenApiSpec, Operation, Parameter, PathItem, RequestBody, ResponseSpec,
    SchemaRef,
};

// Re-export utoipa's ToSchema derive macro as Schema
pub use utoipa::ToSchema as Schema;

use bytes::Bytes;
use http::{header, Response, StatusCode};
use http_body_util::Full;

/// Serve a document as `application/json`
pub fn openapi_json(spec: &OpenApiSpec) -> Response<Full<Bytes>> {
    let (status, content_type, body) = match serde_json::to_vec_pretty(&spec.to_json()) {
        Ok(json) => (StatusCode::OK, "application/json", Bytes::from(json)),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "text/plain; charset=utf-8",
            Bytes::from_static(b"Failed to serialize OpenAPI spec"),
        ),
    };

    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, header::HeaderValue::from_static(content_type));
    response
}
