//! Version registry
//!
//! Maps each supported [`ApiVersion`] to its handlers, mappers and
//! deprecation flag. The registry is assembled once at startup through
//! [`VersionRegistryBuilder`], which refuses to produce an incomplete
//! registry, and is read-only afterwards.
//!
//! ```rust,ignore
//! let registry = VersionRegistry::builder()
//!     .version(
//!         VersionDeclaration::new(ApiVersion::v1())
//!             .deprecated()
//!             .handler(GetAsset::new(service.clone()))
//!             .handler(UpdateAsset::new(service.clone()))
//!             .request_mapper(V1RequestMapper)
//!             .response_mapper(V1ResponseMapper),
//!     )
//!     .default_version(ApiVersion::v1())
//!     .build()?;
//! ```

use crate::error::RegistryConfigurationError;
use crate::handler::{Operation, OperationHandler};
use crate::mapper::{RequestDecoder, ResponseEncoder};
use crate::tracing_macros::{trace_debug, trace_info};
use assetapi_openapi::versioning::ApiVersion;
use assetapi_openapi::VersionDescriptor;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Everything one API version needs to serve requests
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    version: ApiVersion,
    deprecated: bool,
    handlers: BTreeMap<Operation, Arc<dyn OperationHandler>>,
    request_mapper: Option<Arc<dyn RequestDecoder>>,
    response_mapper: Arc<dyn ResponseEncoder>,
}

impl RegistryEntry {
    pub fn version(&self) -> ApiVersion {
        self.version
    }

    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    /// Handler for an operation
    pub fn handler(&self, operation: Operation) -> Option<&dyn OperationHandler> {
        self.handlers.get(&operation).map(|h| h.as_ref())
    }

    /// Operations this version serves, in declaration order of [`Operation`]
    pub fn operations(&self) -> impl Iterator<Item = Operation> + '_ {
        self.handlers.keys().copied()
    }

    pub fn request_mapper(&self) -> Option<&dyn RequestDecoder> {
        self.request_mapper.as_deref()
    }

    pub fn response_mapper(&self) -> &dyn ResponseEncoder {
        self.response_mapper.as_ref()
    }

    /// Documentation descriptor for this version
    pub fn descriptor(&self) -> VersionDescriptor {
        VersionDescriptor::new(self.version, self.deprecated)
    }
}

/// Declaration of one version, before validation
#[derive(Debug, Clone)]
pub struct VersionDeclaration {
    version: ApiVersion,
    deprecated: bool,
    handlers: BTreeMap<Operation, Arc<dyn OperationHandler>>,
    request_mapper: Option<Arc<dyn RequestDecoder>>,
    response_mapper: Option<Arc<dyn ResponseEncoder>>,
}

impl VersionDeclaration {
    /// Declare a version with nothing attached yet
    pub fn new(version: ApiVersion) -> Self {
        Self {
            version,
            deprecated: false,
            handlers: BTreeMap::new(),
            request_mapper: None,
            response_mapper: None,
        }
    }

    /// Mark this version as deprecated
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Attach a handler; a second handler for the same operation replaces the first
    pub fn handler(mut self, handler: impl OperationHandler + 'static) -> Self {
        let handler: Arc<dyn OperationHandler> = Arc::new(handler);
        self.handlers.insert(handler.operation(), handler);
        self
    }

    pub fn request_mapper(mut self, mapper: impl RequestDecoder + 'static) -> Self {
        self.request_mapper = Some(Arc::new(mapper));
        self
    }

    pub fn response_mapper(mut self, mapper: impl ResponseEncoder + 'static) -> Self {
        self.response_mapper = Some(Arc::new(mapper));
        self
    }

    fn validate(
        self,
        operations: &[Operation],
    ) -> Result<RegistryEntry, RegistryConfigurationError> {
        let version = self.version;

        for &operation in operations {
            if !self.handlers.contains_key(&operation) {
                return Err(RegistryConfigurationError::MissingHandler { version, operation });
            }
            if operation.requires_body() && self.request_mapper.is_none() {
                return Err(RegistryConfigurationError::MissingRequestMapper {
                    version,
                    operation,
                });
            }
        }

        let response_mapper = self
            .response_mapper
            .ok_or(RegistryConfigurationError::MissingResponseMapper(version))?;

        Ok(RegistryEntry {
            version,
            deprecated: self.deprecated,
            handlers: self.handlers,
            request_mapper: self.request_mapper,
            response_mapper,
        })
    }
}

/// Builder for [`VersionRegistry`]
#[derive(Debug, Clone)]
pub struct VersionRegistryBuilder {
    declarations: Vec<VersionDeclaration>,
    operations: Vec<Operation>,
    default_version: Option<ApiVersion>,
}

impl VersionRegistryBuilder {
    /// Empty builder requiring every [`Operation`]
    pub fn new() -> Self {
        Self {
            declarations: Vec::new(),
            operations: Operation::ALL.to_vec(),
            default_version: None,
        }
    }

    /// Declare a version
    pub fn version(mut self, declaration: VersionDeclaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Operations every version must implement
    pub fn operations(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        self.operations = operations.into_iter().collect();
        self
    }

    /// Version assumed for requests without a version signal
    ///
    /// Defaults to the highest declared version.
    pub fn default_version(mut self, version: ApiVersion) -> Self {
        self.default_version = Some(version);
        self
    }

    /// Validate the declarations and freeze them into a registry
    pub fn build(self) -> Result<VersionRegistry, RegistryConfigurationError> {
        if self.declarations.is_empty() {
            return Err(RegistryConfigurationError::Empty);
        }

        let mut seen = BTreeSet::new();
        for declaration in &self.declarations {
            if !seen.insert(declaration.version) {
                return Err(RegistryConfigurationError::DuplicateVersion(
                    declaration.version,
                ));
            }
        }

        let default_version = match self.default_version {
            Some(version) if seen.contains(&version) => version,
            Some(version) => {
                return Err(RegistryConfigurationError::DefaultVersionNotRegistered(version))
            }
            None => seen
                .iter()
                .next_back()
                .copied()
                .ok_or(RegistryConfigurationError::Empty)?,
        };

        let mut entries = BTreeMap::new();
        for declaration in self.declarations {
            let entry = declaration.validate(&self.operations)?;
            trace_debug!(
                version = %entry.version,
                deprecated = entry.deprecated,
                "API version validated"
            );
            entries.insert(entry.version, entry);
        }

        let registry = VersionRegistry {
            entries,
            default_version,
        };
        trace_info!(
            supported = %registry.supported_versions_header(),
            default = %default_version,
            "Version registry built"
        );
        Ok(registry)
    }
}

impl Default for VersionRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable map from API version to its [`RegistryEntry`]
#[derive(Debug, Clone)]
pub struct VersionRegistry {
    entries: BTreeMap<ApiVersion, RegistryEntry>,
    default_version: ApiVersion,
}

impl VersionRegistry {
    pub fn builder() -> VersionRegistryBuilder {
        VersionRegistryBuilder::new()
    }

    pub fn get(&self, version: &ApiVersion) -> Option<&RegistryEntry> {
        self.entries.get(version)
    }

    pub fn contains(&self, version: &ApiVersion) -> bool {
        self.entries.contains_key(version)
    }

    /// Registered versions, ascending
    pub fn supported_versions(&self) -> Vec<ApiVersion> {
        self.entries.keys().copied().collect()
    }

    /// Deprecated versions, ascending
    pub fn deprecated_versions(&self) -> Vec<ApiVersion> {
        self.entries
            .values()
            .filter(|entry| entry.deprecated)
            .map(|entry| entry.version)
            .collect()
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    /// Entries, ascending by version
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values()
    }

    /// `api-supported-versions` header value
    pub fn supported_versions_header(&self) -> String {
        join(self.entries.keys())
    }

    /// `api-deprecated-versions` header value
    pub fn deprecated_versions_header(&self) -> String {
        join(self.entries.values().filter(|e| e.deprecated).map(|e| &e.version))
    }
}

fn join<'a>(versions: impl Iterator<Item = &'a ApiVersion>) -> String {
    versions
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
