//! API versioning primitives
//!
//! - [`ApiVersion`] parsing and ordering
//! - [`VersionReader`] strategies (URL segment, header)
//! - [`VersionReaderChain`] evaluating readers in order
//!
//! # Example
//!
//! ```rust
//! use assetapi_openapi::versioning::{ApiVersion, VersionReader, VersionReaderChain};
//! use http::HeaderMap;
//!
//! let chain = VersionReaderChain::with_readers(vec![
//!     VersionReader::url_segment(),
//!     VersionReader::header_with_name("x-api-version"),
//! ]);
//!
//! let found = chain.read("/api/v1/assets/42", &HeaderMap::new()).unwrap();
//! assert_eq!(found.map(|f| f.version), Some(ApiVersion::v1()));
//! ```

mod strategy;
mod version;


pub use strategy::{
    ExtractedVersion, MalformedVersion, VersionReader, VersionReaderChain, VersionSource,
};
pub use version::{ApiVersion, VersionParseError};
