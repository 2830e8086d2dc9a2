//! Versioning configuration
//!
//! Read from `ASSETAPI_`-prefixed environment variables after an optional
//! `.env` file has been loaded:
//!
//! | Variable | Default |
//! |---|---|
//! | `ASSETAPI_DEFAULT_VERSION` | `2.0` |
//! | `ASSETAPI_ASSUME_DEFAULT_VERSION_WHEN_UNSPECIFIED` | `true` |
//! | `ASSETAPI_VERSION_HEADER` | `x-api-version` |
//! | `ASSETAPI_REPORT_API_VERSIONS` | `true` |
//! | `ASSETAPI_DOCS_TITLE` | `Asset API` |

use crate::resolver::VersionResolver;
use assetapi_openapi::versioning::{ApiVersion, VersionReader, VersionReaderChain};
use assetapi_openapi::OpenApiConfig;
use http::HeaderName;
use serde::Deserialize;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "ASSETAPI_";

/// Error type for configuration loading failures
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable did not deserialize
    #[error("configuration error: {0}")]
    Env(#[from] envy::Error),

    /// The version header is not a valid HTTP header name
    #[error("invalid version header name {0:?}")]
    InvalidHeader(String),
}

/// Versioning policy of a deployment
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ApiVersioningConfig {
    /// Version assumed when a request carries no version signal
    pub default_version: ApiVersion,
    /// Whether requests without a version signal get the default version
    pub assume_default_version_when_unspecified: bool,
    /// Header read when the path has no version segment
    pub version_header: String,
    /// Whether responses carry the supported/deprecated version headers
    pub report_api_versions: bool,
    /// Documentation title prefix
    pub docs_title: String,
}

impl Default for ApiVersioningConfig {
    fn default() -> Self {
        Self {
            default_version: ApiVersion::v2(),
            assume_default_version_when_unspecified: true,
            version_header: "x-api-version".to_string(),
            report_api_versions: true,
            docs_title: "Asset API".to_string(),
        }
    }
}

impl ApiVersioningConfig {
    /// Load `.env` (if present) and read the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        envy::prefixed(ENV_PREFIX)
            .from_env::<Self>()
            .map_err(ConfigError::from)?
            .validated()
    }

    /// Read from explicit `(name, value)` pairs
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::prefixed(ENV_PREFIX)
            .from_iter::<_, Self>(vars)
            .map_err(ConfigError::from)?
            .validated()
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.version_header = self.version_header.trim().to_ascii_lowercase();
        HeaderName::from_bytes(self.version_header.as_bytes())
            .map_err(|_| ConfigError::InvalidHeader(self.version_header.clone()))?;
        Ok(self)
    }

    /// URL segment reader first, then the configured header
    pub fn reader_chain(&self) -> VersionReaderChain {
        VersionReaderChain::with_readers(vec![
            VersionReader::url_segment(),
            VersionReader::header_with_name(self.version_header.as_str()),
        ])
    }

    pub fn resolver(&self) -> VersionResolver {
        VersionResolver::new(
            self.reader_chain(),
            self.default_version,
            self.assume_default_version_when_unspecified,
        )
    }

    pub fn openapi_config(&self) -> OpenApiConfig {
        OpenApiConfig::new(self.docs_title.as_str())
    }
}
