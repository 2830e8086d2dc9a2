//! Dispatch of resolved requests
//!
//! Looks up the version's handler, runs it with the version's request mapper,
//! and encodes the domain result with the version's response mapper.

use crate::error::DispatchError;
use crate::handler::{Operation, OperationRequest};
use crate::registry::VersionRegistry;
use crate::tracing_macros::trace_debug;
use assetapi_openapi::versioning::ApiVersion;
use bytes::Bytes;
use std::sync::Arc;

/// Routes (version, operation) pairs to registry entries
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<VersionRegistry>,
}

impl Dispatcher {
    pub fn new(registry: Arc<VersionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    /// Run an operation for a version and return the encoded response body
    pub fn dispatch(
        &self,
        version: ApiVersion,
        operation: Operation,
        request: OperationRequest,
    ) -> Result<Bytes, DispatchError> {
        let entry = self
            .registry
            .get(&version)
            .ok_or(DispatchError::UnknownVersion(version))?;
        let handler = entry
            .handler(operation)
            .ok_or(DispatchError::UnknownOperation { version, operation })?;

        trace_debug!(version = %version, operation = %operation, id = %request.id, "Dispatching");

        let asset = handler.handle(&request, entry.request_mapper())?;
        let body = serde_json::to_vec(&entry.response_mapper().encode(&asset)?)?;
        Ok(Bytes::from(body))
    }
}
