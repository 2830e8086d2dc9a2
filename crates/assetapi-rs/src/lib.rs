//! # AssetAPI
//!
//! A versioned HTTP API over one asset domain model.
//!
//! Every request is served by exactly one registered API version, read from
//! the URL (`/api/v1/assets/42`), then the `x-api-version` header, then the
//! configured default. Each version owns its wire shapes: V1 speaks
//! `{id, status, notes, value}`, V2 speaks
//! `{assetId, status, notes, totalValue, retiredOn}`. Each version also gets
//! its own OpenAPI document at `/openapi/{group}.json`, with deprecated
//! versions marked.
//!
//! ## Quick Start
//!
//! ```rust
//! use assetapi_rs::prelude::*;
//! use std::sync::Arc;
//!
//! let service = Arc::new(InMemoryAssetService::new());
//! let api = bootstrap_with(service, &ApiVersioningConfig::default()).unwrap();
//!
//! let request = http::Request::builder()
//!     .method("PATCH")
//!     .uri("/api/v1/assets/42")
//!     .body(bytes::Bytes::from_static(br#"{"status":"Active","value":100.0}"#))
//!     .unwrap();
//!
//! let response = api.handle(request);
//! assert_eq!(response.status(), http::StatusCode::OK);
//! assert_eq!(response.headers()["api-deprecated-versions"], "1.0");
//! ```
//!
//! ## Features
//!
//! - `tracing` (default) - structured logs from resolution, registry build and dispatch

// Re-export core functionality
pub use assetapi_core::*;

// Re-export documentation and versioning primitives
pub use assetapi_openapi::{
    openapi_json, DocumentAnnotator, OpenApiConfig, OpenApiSpec, VersionDescriptor,
    DOCUMENT_DEPRECATION_NOTICE, OPERATION_DEPRECATION_NOTICE,
};
pub use assetapi_openapi::versioning;

use crate::versioning::ApiVersion;
use assetapi_core::mapper::v1::{V1RequestMapper, V1ResponseMapper};
use assetapi_core::mapper::v2::{V2RequestMapper, V2ResponseMapper};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Failure starting the API
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Build(#[from] ApiBuildError),
}

/// Registry with V1 (deprecated) and V2 over the same asset service
pub fn standard_registry(
    service: Arc<dyn AssetService>,
    default_version: ApiVersion,
) -> std::result::Result<VersionRegistry, RegistryConfigurationError> {
    VersionRegistry::builder()
        .version(
            VersionDeclaration::new(ApiVersion::v1())
                .deprecated()
                .handler(GetAsset::new(service.clone()))
                .handler(UpdateAsset::new(service.clone()))
                .request_mapper(V1RequestMapper)
                .response_mapper(V1ResponseMapper),
        )
        .version(
            VersionDeclaration::new(ApiVersion::v2())
                .handler(GetAsset::new(service.clone()))
                .handler(UpdateAsset::new(service))
                .request_mapper(V2RequestMapper)
                .response_mapper(V2ResponseMapper),
        )
        .default_version(default_version)
        .build()
}

/// Build the standard API from an explicit configuration
pub fn bootstrap_with(
    service: Arc<dyn AssetService>,
    config: &ApiVersioningConfig,
) -> std::result::Result<VersionedApi, ApiBuildError> {
    let registry = standard_registry(service, config.default_version)?;
    VersionedApi::from_config(registry, config)
}

/// Build the standard API from `ASSETAPI_*` environment variables
pub fn bootstrap(
    service: Arc<dyn AssetService>,
) -> std::result::Result<VersionedApi, BootstrapError> {
    let config = ApiVersioningConfig::from_env()?;
    Ok(bootstrap_with(service, &config)?)
}

/// Install a `fmt` subscriber filtered by `RUST_LOG`
///
/// Falls back to `info,assetapi=debug`. Does nothing if a global subscriber
/// is already set.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,assetapi=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Prelude module - import everything you need with `use assetapi_rs::prelude::*`
pub mod prelude {
    pub use crate::versioning::{ApiVersion, VersionReader, VersionReaderChain, VersionSource};
    pub use crate::{bootstrap, bootstrap_with, init_tracing, standard_registry, BootstrapError};
    pub use assetapi_core::{
        ApiError, ApiVersioningConfig, Asset, AssetId, AssetService, AssetStatus, AssetUpdate,
        InMemoryAssetService, Money, Operation, RetirementChange, ServiceError,
        VersionDeclaration, VersionRegistry, VersionResolver, VersionedApi,
    };

    // Re-export OpenAPI schema derive
    pub use assetapi_openapi::{OpenApiConfig, Schema};

    // Re-export commonly used external types
    pub use serde::{Deserialize, Serialize};
    pub use tracing::{debug, error, info, trace, warn};
}
