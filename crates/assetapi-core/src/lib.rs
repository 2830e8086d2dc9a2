//! # AssetAPI Core
//!
//! Version resolution, registry, dispatch and per-version wire mapping for
//! the asset API.
//!
//! This crate is not meant to be used directly. Use `assetapi-rs` instead.

mod api;
mod config;
mod dispatch;
mod docs;
pub mod domain;
mod error;
mod handler;
pub mod mapper;
mod registry;
mod resolver;
pub mod service;
mod tracing_macros;

// Public API
pub use api::{VersionedApi, DEPRECATED_VERSIONS_HEADER, SUPPORTED_VERSIONS_HEADER};
pub use config::{ApiVersioningConfig, ConfigError, ENV_PREFIX};
pub use dispatch::Dispatcher;
pub use docs::{build_document, build_documents, VersionDocument};
pub use domain::{
    Asset, AssetId, AssetStatus, AssetUpdate, InvalidMoney, Money, RetirementChange, UnknownStatus,
};
pub use error::{
    ApiBuildError, ApiError, DecodeError, DispatchError, FieldError, RegistryConfigurationError,
    ResolutionError, Result,
};
pub use handler::{GetAsset, Operation, OperationHandler, OperationRequest, UpdateAsset};
pub use mapper::{RequestDecoder, ResponseEncoder};
pub use registry::{RegistryEntry, VersionDeclaration, VersionRegistry, VersionRegistryBuilder};
pub use resolver::{ResolvedVersion, VersionResolver};
pub use service::{AssetService, InMemoryAssetService, ServiceError};
