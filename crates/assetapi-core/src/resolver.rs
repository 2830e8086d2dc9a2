//! Version resolution
//!
//! Settles which registered version serves a request. Precedence:
//!
//! 1. an explicit signal found by the reader chain (URL segment, then header)
//! 2. the default version, when the default may be assumed
//! 3. otherwise [`ResolutionError::VersionRequired`]
//!
//! A malformed token is always an error, even when a default exists.

use crate::error::ResolutionError;
use crate::registry::VersionRegistry;
use crate::tracing_macros::trace_debug;
use assetapi_openapi::versioning::{ApiVersion, VersionReaderChain, VersionSource};
use http::HeaderMap;

/// The version a request will be served with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedVersion {
    /// A registered version, either requested or the assumed default
    pub version: ApiVersion,
    /// Where the version came from
    pub source: VersionSource,
    /// Whether the registry marks the version deprecated
    pub deprecated: bool,
}

/// Picks the API version for each request
#[derive(Debug, Clone)]
pub struct VersionResolver {
    chain: VersionReaderChain,
    default_version: ApiVersion,
    assume_default: bool,
}

impl VersionResolver {
    pub fn new(chain: VersionReaderChain, default_version: ApiVersion, assume_default: bool) -> Self {
        Self {
            chain,
            default_version,
            assume_default,
        }
    }

    pub fn chain(&self) -> &VersionReaderChain {
        &self.chain
    }

    pub fn default_version(&self) -> ApiVersion {
        self.default_version
    }

    pub fn assumes_default(&self) -> bool {
        self.assume_default
    }

    /// Resolve the version of a request
    pub fn resolve(
        &self,
        parts: &http::request::Parts,
        registry: &VersionRegistry,
    ) -> Result<ResolvedVersion, ResolutionError> {
        self.resolve_path(parts.uri.path(), &parts.headers, registry)
    }

    /// Resolve from a raw path and headers
    pub fn resolve_path(
        &self,
        path: &str,
        headers: &HeaderMap,
        registry: &VersionRegistry,
    ) -> Result<ResolvedVersion, ResolutionError> {
        let (version, source) = match self.chain.read(path, headers)? {
            Some(found) => (found.version, found.source),
            None if self.assume_default => (self.default_version, VersionSource::Default),
            None => return Err(ResolutionError::VersionRequired),
        };

        let entry = registry
            .get(&version)
            .ok_or_else(|| ResolutionError::UnsupportedVersion {
                requested: version,
                supported: registry.supported_versions(),
            })?;

        trace_debug!(version = %version, source = %source, path = path, "API version resolved");

        Ok(ResolvedVersion {
            version,
            source,
            deprecated: entry.is_deprecated(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::{GetAsset, UpdateAsset};
    use crate::mapper::v1::{V1RequestMapper, V1ResponseMapper};
    use crate::mapper::v2::{V2RequestMapper, V2ResponseMapper};
    use crate::registry::VersionDeclaration;
    use crate::service::{AssetService, InMemoryAssetService};
    use http::HeaderValue;
    use std::sync::Arc;

    fn registry() -> VersionRegistry {
        let service: Arc<dyn AssetService> = Arc::new(InMemoryAssetService::new());
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
            .build()
            .unwrap()
    }

    fn header(version: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-version", HeaderValue::from_str(version).unwrap());
        headers
    }

    fn resolver(assume_default: bool) -> VersionResolver {
        VersionResolver::new(VersionReaderChain::new(), ApiVersion::v2(), assume_default)
    }

    #[test]
    fn test_url_segment_wins_over_header() {
        let resolved = resolver(true)
            .resolve_path("/api/v1/assets/42", &header("2"), &registry())
            .unwrap();

        assert_eq!(resolved.version, ApiVersion::v1());
        assert_eq!(resolved.source, VersionSource::UrlSegment);
        assert!(resolved.deprecated);
    }

    #[test]
    fn test_header_used_without_url_segment() {
        let resolved = resolver(false)
            .resolve_path("/api/assets/42", &header("1.0"), &registry())
            .unwrap();

        assert_eq!(resolved.version, ApiVersion::v1());
        assert_eq!(resolved.source, VersionSource::Header);
    }

    #[test]
    fn test_default_assumed_without_signal() {
        let resolved = resolver(true)
            .resolve_path("/api/assets/42", &HeaderMap::new(), &registry())
            .unwrap();

        assert_eq!(resolved.version, ApiVersion::v2());
        assert_eq!(resolved.source, VersionSource::Default);
        assert!(!resolved.deprecated);
    }

    #[test]
    fn test_version_required_without_default() {
        let err = resolver(false)
            .resolve_path("/api/assets/42", &HeaderMap::new(), &registry())
            .unwrap_err();
        assert_eq!(err, ResolutionError::VersionRequired);
    }

    #[test]
    fn test_malformed_token_beats_default() {
        let err = resolver(true)
            .resolve_path("/api/assets/42", &header("two"), &registry())
            .unwrap_err();
        assert!(matches!(err, ResolutionError::MalformedVersion(_)));
    }

    #[test]
    fn test_unregistered_version_is_unsupported() {
        let err = resolver(true)
            .resolve_path("/api/v3/assets/42", &HeaderMap::new(), &registry())
            .unwrap_err();

        assert_eq!(
            err,
            ResolutionError::UnsupportedVersion {
                requested: ApiVersion::major(3),
                supported: vec![ApiVersion::v1(), ApiVersion::v2()],
            }
        );
    }

    #[test]
    fn test_resolve_from_request_parts() {
        let (parts, _) = http::Request::builder()
            .uri("/api/v2/assets/1")
            .body(())
            .unwrap()
            .into_parts();

        let resolved = resolver(false).resolve(&parts, &registry()).unwrap();
        assert_eq!(resolved.version, ApiVersion::v2());
    }
}
