//! Operation handlers
//!
//! One handler type per [`Operation`]. The registry holds an instance per API
//! version, so nothing in here branches on the version: wire-shape differences
//! stay in the version's mappers.

use crate::domain::{Asset, AssetId};
use crate::error::DispatchError;
use crate::mapper::RequestDecoder;
use crate::service::AssetService;
use bytes::Bytes;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// Operations on the asset resource
///
/// Adding an operation means adding a variant and a handler; every registered
/// version must then provide it or the registry refuses to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    /// `GET /api/v{version}/assets/{id}`
    Get,
    /// `PATCH /api/v{version}/assets/{id}`
    Update,
}

impl Operation {
    /// Every operation
    pub const ALL: [Operation; 2] = [Operation::Get, Operation::Update];

    /// Operation name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Update => "update",
        }
    }

    /// HTTP method serving this operation
    pub fn method(&self) -> Method {
        match self {
            Self::Get => Method::GET,
            Self::Update => Method::PATCH,
        }
    }

    /// Operation served by an HTTP method
    pub fn from_method(method: &Method) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.method() == *method)
    }

    /// Whether the operation reads a request body
    pub fn requires_body(&self) -> bool {
        matches!(self, Self::Update)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-request input handed to a handler
#[derive(Debug, Clone)]
pub struct OperationRequest {
    /// Asset addressed by the route
    pub id: AssetId,
    /// Raw request body (empty for operations without one)
    pub body: Bytes,
}

impl OperationRequest {
    /// Request without a body
    pub fn new(id: impl Into<AssetId>) -> Self {
        Self {
            id: id.into(),
            body: Bytes::new(),
        }
    }

    /// Request carrying a body
    pub fn with_body(id: impl Into<AssetId>, body: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

/// Runs one operation against the asset service
pub trait OperationHandler: Send + Sync {
    /// The operation this handler implements
    fn operation(&self) -> Operation;

    /// Run the operation
    ///
    /// `decoder` is the version's request mapper.
    fn handle(
        &self,
        request: &OperationRequest,
        decoder: Option<&dyn RequestDecoder>,
    ) -> Result<Asset, DispatchError>;
}

impl fmt::Debug for dyn OperationHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandler")
            .field("operation", &self.operation())
            .finish()
    }
}

/// Handler for [`Operation::Get`]
#[derive(Clone)]
pub struct GetAsset {
    service: Arc<dyn AssetService>,
}

impl GetAsset {
    pub fn new(service: Arc<dyn AssetService>) -> Self {
        Self { service }
    }
}

impl OperationHandler for GetAsset {
    fn operation(&self) -> Operation {
        Operation::Get
    }

    fn handle(
        &self,
        request: &OperationRequest,
        _decoder: Option<&dyn RequestDecoder>,
    ) -> Result<Asset, DispatchError> {
        Ok(self.service.get(&request.id)?)
    }
}

/// Handler for [`Operation::Update`]
#[derive(Clone)]
pub struct UpdateAsset {
    service: Arc<dyn AssetService>,
}

impl UpdateAsset {
    pub fn new(service: Arc<dyn AssetService>) -> Self {
        Self { service }
    }
}

impl OperationHandler for UpdateAsset {
    fn operation(&self) -> Operation {
        Operation::Update
    }

    fn handle(
        &self,
        request: &OperationRequest,
        decoder: Option<&dyn RequestDecoder>,
    ) -> Result<Asset, DispatchError> {
        let decoder = decoder.ok_or(DispatchError::MissingDecoder(Operation::Update))?;
        let update = decoder.decode_update(&request.body)?;
        Ok(self.service.update(&request.id, update)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_methods() {
        assert_eq!(Operation::from_method(&Method::GET), Some(Operation::Get));
        assert_eq!(Operation::from_method(&Method::PATCH), Some(Operation::Update));
        assert_eq!(Operation::from_method(&Method::DELETE), None);
    }

    #[test]
    fn test_only_update_reads_a_body() {
        assert!(!Operation::Get.requires_body());
        assert!(Operation::Update.requires_body());
    }
}
