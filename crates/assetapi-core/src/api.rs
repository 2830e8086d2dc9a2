//! HTTP boundary
//!
//! [`VersionedApi`] turns an `http::Request<Bytes>` into an
//! `http::Response<Full<Bytes>>`: it matches the route, resolves the API
//! version, dispatches to the version's handler and renders errors as JSON.
//! It also serves the per-version OpenAPI documents. Transport (sockets,
//! TLS, body streaming) is left to whatever server hosts it.

use crate::config::ApiVersioningConfig;
use crate::dispatch::Dispatcher;
use crate::docs::{build_documents, VersionDocument};
use crate::error::{ApiBuildError, ApiError, RegistryConfigurationError};
use crate::handler::{Operation, OperationRequest};
use crate::registry::VersionRegistry;
use crate::resolver::VersionResolver;
use crate::tracing_macros::{trace_error, trace_info, trace_warn};
use assetapi_openapi::{openapi_json, OpenApiConfig};
use bytes::Bytes;
use http::{header, HeaderValue, Method, Request, Response, StatusCode};
use http_body_util::Full;
use std::sync::Arc;
use std::time::Instant;

/// Header listing every supported version
pub const SUPPORTED_VERSIONS_HEADER: &str = "api-supported-versions";
/// Header listing deprecated versions
pub const DEPRECATED_VERSIONS_HEADER: &str = "api-deprecated-versions";

/// Asset route, matched after the version segment has been stripped
const ASSET_ROUTE: &str = "/api/assets/:id";

#[derive(Debug, Clone, Copy)]
enum Route {
    Asset,
    Document(usize),
}

/// Versioned asset API
#[derive(Clone)]
pub struct VersionedApi {
    resolver: VersionResolver,
    dispatcher: Dispatcher,
    router: Arc<matchit::Router<Route>>,
    documents: Vec<VersionDocument>,
    report_api_versions: bool,
    supported_versions: Option<HeaderValue>,
    deprecated_versions: Option<HeaderValue>,
}

impl VersionedApi {
    /// Assemble the API with default documentation settings
    ///
    /// Fails when the resolver may assume a default version the registry
    /// does not hold.
    pub fn new(registry: VersionRegistry, resolver: VersionResolver) -> Result<Self, ApiBuildError> {
        Self::with_docs(registry, resolver, &OpenApiConfig::default())
    }

    /// Assemble the API from a loaded configuration
    pub fn from_config(
        registry: VersionRegistry,
        config: &ApiVersioningConfig,
    ) -> Result<Self, ApiBuildError> {
        let api = Self::with_docs(registry, config.resolver(), &config.openapi_config())?;
        Ok(api.report_api_versions(config.report_api_versions))
    }

    /// Assemble the API with explicit documentation settings
    pub fn with_docs(
        registry: VersionRegistry,
        resolver: VersionResolver,
        docs: &OpenApiConfig,
    ) -> Result<Self, ApiBuildError> {
        if resolver.assumes_default() && !registry.contains(&resolver.default_version()) {
            return Err(RegistryConfigurationError::DefaultVersionNotRegistered(
                resolver.default_version(),
            )
            .into());
        }

        let documents = build_documents(&registry, docs);

        let mut router = matchit::Router::new();
        router.insert(ASSET_ROUTE, Route::Asset)?;
        for (index, document) in documents.iter().enumerate() {
            check_document_path(&router, &resolver, &document.path)?;
            router.insert(document.path.as_str(), Route::Document(index))?;
        }

        let supported_versions = header_value(registry.supported_versions_header());
        let deprecated_versions = header_value(registry.deprecated_versions_header());

        trace_info!(
            supported = %registry.supported_versions_header(),
            documents = documents.len(),
            "Versioned API ready"
        );

        Ok(Self {
            resolver,
            dispatcher: Dispatcher::new(Arc::new(registry)),
            router: Arc::new(router),
            documents,
            report_api_versions: true,
            supported_versions,
            deprecated_versions,
        })
    }

    /// Toggle the supported/deprecated version response headers
    pub fn report_api_versions(mut self, enabled: bool) -> Self {
        self.report_api_versions = enabled;
        self
    }

    pub fn registry(&self) -> &VersionRegistry {
        self.dispatcher.registry()
    }

    /// Generated per-version documents
    pub fn documents(&self) -> &[VersionDocument] {
        &self.documents
    }

    /// Handle one request
    pub fn handle(&self, request: Request<Bytes>) -> Response<Full<Bytes>> {
        let start = Instant::now();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        let mut response = match self.route(request) {
            Ok(response) => response,
            Err(err) => error_response(err),
        };

        if self.report_api_versions {
            let headers = response.headers_mut();
            if let Some(value) = &self.supported_versions {
                headers.insert(SUPPORTED_VERSIONS_HEADER, value.clone());
            }
            if let Some(value) = &self.deprecated_versions {
                headers.insert(DEPRECATED_VERSIONS_HEADER, value.clone());
            }
        }

        log_request(&method, &path, response.status(), start);
        response
    }

    fn route(&self, request: Request<Bytes>) -> Result<Response<Full<Bytes>>, ApiError> {
        let (parts, body) = request.into_parts();
        let path = parts.uri.path();

        let stripped = self.resolver.chain().strip_version_from_path(path);
        let matched = self
            .router
            .at(&stripped)
            .map_err(|_| ApiError::not_found(format!("No route found for {} {}", parts.method, path)))?;

        let id = match *matched.value {
            Route::Document(index) => return self.document(index, &parts.method, path),
            Route::Asset => matched.params.get("id").unwrap_or_default().to_string(),
        };

        let resolved = self.resolver.resolve(&parts, self.registry())?;
        let entry = self
            .registry()
            .get(&resolved.version)
            .ok_or_else(|| ApiError::internal("An internal error occurred"))?;

        let operation = Operation::from_method(&parts.method)
            .filter(|op| entry.handler(*op).is_some())
            .ok_or_else(|| method_not_allowed(&parts.method, path, entry.operations()))?;

        let request = if operation.requires_body() {
            OperationRequest::with_body(id, body)
        } else {
            OperationRequest::new(id)
        };

        let bytes = self
            .dispatcher
            .dispatch(resolved.version, operation, request)?;
        Ok(json_response(StatusCode::OK, bytes))
    }

    fn document(
        &self,
        index: usize,
        method: &Method,
        path: &str,
    ) -> Result<Response<Full<Bytes>>, ApiError> {
        if method != Method::GET {
            return Err(method_not_allowed(method, path, [Operation::Get]));
        }
        self.documents
            .get(index)
            .map(|document| openapi_json(&document.spec))
            .ok_or_else(|| ApiError::not_found(format!("No document at {}", path)))
    }
}

impl std::fmt::Debug for VersionedApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VersionedApi")
            .field("resolver", &self.resolver)
            .field("registry", self.registry())
            .field("documents", &self.documents.len())
            .field("report_api_versions", &self.report_api_versions)
            .finish()
    }
}

/// A document path must be reachable as-is and must not steal asset requests
fn check_document_path(
    router: &matchit::Router<Route>,
    resolver: &VersionResolver,
    path: &str,
) -> Result<(), ApiBuildError> {
    if let Ok(matched) = router.at(path) {
        let existing = match matched.value {
            Route::Asset => ASSET_ROUTE,
            Route::Document(_) => "another document",
        };
        return Err(ApiBuildError::Route(format!(
            "documentation path {} is already served by {}",
            path, existing
        )));
    }
    if resolver.chain().strip_version_from_path(path) != path {
        return Err(ApiBuildError::Route(format!(
            "documentation path {} contains a version segment",
            path
        )));
    }
    Ok(())
}

fn header_value(versions: String) -> Option<HeaderValue> {
    if versions.is_empty() {
        return None;
    }
    HeaderValue::from_str(&versions).ok()
}

fn json_response(status: StatusCode, body: Bytes) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn method_not_allowed(
    method: &Method,
    path: &str,
    allowed: impl IntoIterator<Item = Operation>,
) -> ApiError {
    let allowed: Vec<String> = allowed
        .into_iter()
        .map(|op| op.method().to_string())
        .collect();
    ApiError::method_not_allowed(format!("Method {} not allowed for {}", method, path))
        .with_allow(allowed.join(", "))
}

fn error_response(err: ApiError) -> Response<Full<Bytes>> {
    if err.status.is_server_error() {
        trace_error!(
            error_type = %err.error_type,
            internal = err.internal_details().unwrap_or(""),
            "{}",
            err.message
        );
    } else {
        trace_warn!(error_type = %err.error_type, "{}", err.message);
    }
    err.into_response()
}

fn log_request(method: &Method, path: &str, status: StatusCode, start: Instant) {
    let elapsed = start.elapsed();

    if status.is_success() {
        trace_info!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request completed"
        );
    } else {
        trace_warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            duration_ms = elapsed.as_millis() as u64,
            "Request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Asset, AssetId, AssetStatus};
    use crate::handler::{GetAsset, UpdateAsset};
    use crate::mapper::v1::{V1RequestMapper, V1ResponseMapper};
    use crate::mapper::v2::{V2RequestMapper, V2ResponseMapper};
    use crate::registry::VersionDeclaration;
    use crate::service::{AssetService, InMemoryAssetService};
    use assetapi_openapi::versioning::{ApiVersion, VersionReaderChain};
    use http_body_util::BodyExt;

    fn registry() -> VersionRegistry {
        let service: Arc<dyn AssetService> = Arc::new(InMemoryAssetService::with_assets([
            Asset::new(AssetId::new("42"), AssetStatus::Active),
        ]));
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

    fn api(assume_default: bool) -> VersionedApi {
        let resolver =
            VersionResolver::new(VersionReaderChain::new(), ApiVersion::v2(), assume_default);
        VersionedApi::new(registry(), resolver).unwrap()
    }

    fn request(method: Method, uri: &str, body: &'static str) -> Request<Bytes> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::from_static(body.as_bytes()))
            .unwrap()
    }

    async fn body_json(response: Response<Full<Bytes>>) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_get_in_requested_version() {
        let response = api(true).handle(request(Method::GET, "/api/v1/assets/42", ""));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[SUPPORTED_VERSIONS_HEADER], "1.0, 2.0");
        assert_eq!(response.headers()[DEPRECATED_VERSIONS_HEADER], "1.0");
        assert_eq!(body_json(response).await["id"], "42");
    }

    #[tokio::test]
    async fn test_unversioned_alias_uses_default() {
        let response = api(true).handle(request(Method::GET, "/api/assets/42", ""));

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["assetId"], "42");
    }

    #[tokio::test]
    async fn test_unversioned_alias_without_default() {
        let response = api(false).handle(request(Method::GET, "/api/assets/42", ""));

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["error"]["type"],
            "api_version_required"
        );
    }

    #[tokio::test]
    async fn test_unknown_method_lists_allowed() {
        let response = api(true).handle(request(Method::DELETE, "/api/v2/assets/42", ""));

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET, PATCH");
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let response = api(true).handle(request(Method::GET, "/api/v2/widgets", ""));

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[SUPPORTED_VERSIONS_HEADER], "1.0, 2.0");
    }

    #[tokio::test]
    async fn test_serves_version_documents() {
        let api = api(true);

        let response = api.handle(request(Method::GET, "/openapi/v1.json", ""));
        assert_eq!(response.status(), StatusCode::OK);
        let doc = body_json(response).await;
        assert_eq!(doc["info"]["version"], "1.0");
        assert_eq!(doc["paths"]["/api/v1/assets/{id}"]["get"]["deprecated"], true);

        let response = api.handle(request(Method::POST, "/openapi/v2.json", ""));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_version_headers_can_be_disabled() {
        let response = api(true)
            .report_api_versions(false)
            .handle(request(Method::GET, "/api/v2/assets/42", ""));

        assert!(response.headers().get(SUPPORTED_VERSIONS_HEADER).is_none());
        assert!(response.headers().get(DEPRECATED_VERSIONS_HEADER).is_none());
    }

    #[test]
    fn test_default_must_be_registered() {
        let resolver = VersionResolver::new(VersionReaderChain::new(), ApiVersion::major(3), true);
        let err = VersionedApi::new(registry(), resolver).unwrap_err();

        assert_eq!(
            err,
            ApiBuildError::Registry(RegistryConfigurationError::DefaultVersionNotRegistered(
                ApiVersion::major(3)
            ))
        );
    }

    #[test]
    fn test_document_path_must_not_shadow_assets() {
        let resolver = VersionResolver::new(VersionReaderChain::new(), ApiVersion::v2(), true);
        let docs = OpenApiConfig::default().json_path("/api/assets/{group}");

        let err = VersionedApi::with_docs(registry(), resolver, &docs).unwrap_err();
        match err {
            ApiBuildError::Route(message) => assert!(message.contains(ASSET_ROUTE)),
            other => panic!("expected a route error, got {:?}", other),
        }
    }

    #[test]
    fn test_document_path_must_not_carry_a_version() {
        let resolver = VersionResolver::new(VersionReaderChain::new(), ApiVersion::v2(), true);
        let docs = OpenApiConfig::default().json_path("/api/v1/docs/{group}.json");

        let err = VersionedApi::with_docs(registry(), resolver, &docs).unwrap_err();
        assert!(matches!(err, ApiBuildError::Route(_)));
    }
}
