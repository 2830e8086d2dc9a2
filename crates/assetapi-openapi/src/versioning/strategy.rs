//! Version reader strategies
//!
//! A [`VersionReaderChain`] asks each [`VersionReader`] in order for a version
//! and keeps the first answer. A reader either has no opinion (the attribute it
//! inspects is absent) or finds a token; a token that does not parse stops the
//! chain with a [`MalformedVersion`] instead of letting a later reader or the
//! default version take over.

use super::version::{ApiVersion, VersionParseError};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;

const VERSION_PLACEHOLDER: &str = "{version}";

/// Strategy for reading an API version from one request attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VersionReader {
    /// Read the version from a URL path segment
    ///
    /// The pattern is anchored at the start of the path and contains a
    /// `{version}` placeholder, e.g. `/api/v{version}/`.
    UrlSegment {
        /// Route template prefix holding the placeholder
        pattern: String,
    },

    /// Read the version from an HTTP header
    ///
    /// Example: `x-api-version: 2`
    Header {
        /// Header name, matched case-insensitively
        name: String,
    },
}

impl VersionReader {
    /// URL segment reader for `/api/v{version}/`
    pub fn url_segment() -> Self {
        Self::UrlSegment {
            pattern: "/api/v{version}/".to_string(),
        }
    }

    /// URL segment reader with a custom pattern
    pub fn url_segment_with_pattern(pattern: impl Into<String>) -> Self {
        Self::UrlSegment {
            pattern: pattern.into(),
        }
    }

    /// Header reader for `x-api-version`
    pub fn header() -> Self {
        Self::header_with_name("x-api-version")
    }

    /// Header reader with a custom header name
    pub fn header_with_name(name: impl Into<String>) -> Self {
        Self::Header {
            name: name.into().to_ascii_lowercase(),
        }
    }

    /// Where a version found by this reader came from
    pub fn source(&self) -> VersionSource {
        match self {
            Self::UrlSegment { .. } => VersionSource::UrlSegment,
            Self::Header { .. } => VersionSource::Header,
        }
    }

    /// Read a version from the request path and headers
    ///
    /// `Ok(None)` means the attribute is absent.
    pub fn read(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Option<ApiVersion>, MalformedVersion> {
        let token = match self {
            Self::UrlSegment { pattern } => path_token(path, pattern).map(str::to_string),
            Self::Header { name } => match headers.get(name.as_str()) {
                Some(value) => Some(value.to_str().map(str::to_string).map_err(|_| {
                    MalformedVersion {
                        origin: VersionSource::Header,
                        token: String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        reason: VersionParseError::InvalidFormat,
                    }
                })?),
                None => None,
            },
        };

        match token {
            None => Ok(None),
            Some(token) => token
                .parse()
                .map(Some)
                .map_err(|reason| MalformedVersion {
                    origin: self.source(),
                    token,
                    reason,
                }),
        }
    }
}

/// Split a pattern around its `{version}` placeholder
fn split_pattern(pattern: &str) -> Option<(&str, &str)> {
    let (before, after) = pattern.split_once(VERSION_PLACEHOLDER)?;
    Some((before, after))
}

/// The raw version token in `path`, when `path` follows `pattern`
fn path_token<'a>(path: &'a str, pattern: &str) -> Option<&'a str> {
    let (before, after) = split_pattern(pattern)?;
    let remaining = path.strip_prefix(before)?;

    let end = if after.is_empty() {
        remaining.len()
    } else {
        remaining.find(after).unwrap_or(remaining.len())
    };

    Some(&remaining[..end])
}

/// Remove the versioned segment from `path`
///
/// `/api/v1/assets/42` becomes `/api/assets/42` for the pattern
/// `/api/v{version}/`.
fn strip_path_version(path: &str, pattern: &str) -> Option<String> {
    let (before, after) = split_pattern(pattern)?;
    let remaining = path.strip_prefix(before)?;

    let end = if after.is_empty() {
        remaining.len()
    } else {
        remaining.find(after)?
    };

    // Keep everything up to and including the slash that opens the segment
    let base = match before.rfind('/') {
        Some(idx) => &before[..=idx],
        None => "",
    };
    let suffix = &remaining[end + after.len()..];

    let mut stripped = format!("{}{}", base, suffix);
    if stripped.is_empty() {
        stripped.push('/');
    }
    Some(stripped)
}

/// Ordered list of version readers
#[derive(Debug, Clone)]
pub struct VersionReaderChain {
    readers: Vec<VersionReader>,
}

impl VersionReaderChain {
    /// URL segment first, then the `x-api-version` header
    pub fn new() -> Self {
        Self::with_readers(vec![VersionReader::url_segment(), VersionReader::header()])
    }

    /// Create a chain from readers (tried in order)
    pub fn with_readers(readers: Vec<VersionReader>) -> Self {
        Self { readers }
    }

    /// Append a reader to the end of the chain
    pub fn add_reader(mut self, reader: VersionReader) -> Self {
        self.readers.push(reader);
        self
    }

    /// Readers in evaluation order
    pub fn readers(&self) -> &[VersionReader] {
        &self.readers
    }

    /// Read the first version any reader finds
    ///
    /// A malformed token fails immediately; later readers are not consulted.
    pub fn read(
        &self,
        path: &str,
        headers: &HeaderMap,
    ) -> Result<Option<ExtractedVersion>, MalformedVersion> {
        for reader in &self.readers {
            if let Some(version) = reader.read(path, headers)? {
                return Ok(Some(ExtractedVersion {
                    version,
                    source: reader.source(),
                }));
            }
        }
        Ok(None)
    }

    /// Remove the version segment from a path, if a URL reader matches it
    pub fn strip_version_from_path(&self, path: &str) -> String {
        for reader in &self.readers {
            if let VersionReader::UrlSegment { pattern } = reader {
                if let Some(stripped) = strip_path_version(path, pattern) {
                    return stripped;
                }
            }
        }
        path.to_string()
    }
}

impl Default for VersionReaderChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of version extraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractedVersion {
    /// The extracted version
    pub version: ApiVersion,
    /// Source of the version
    pub source: VersionSource,
}

/// Source from which a version was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VersionSource {
    /// Extracted from the URL path
    UrlSegment,
    /// Extracted from a request header
    Header,
    /// No signal; the configured default was used
    Default,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UrlSegment => write!(f, "url segment"),
            Self::Header => write!(f, "header"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// A version token was present but could not be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed API version {token:?} in {origin}: {reason}")]
pub struct MalformedVersion {
    /// Reader that found the token
    pub origin: VersionSource,
    /// The raw token
    pub token: String,
    /// Why it did not parse
    pub reason: VersionParseError,
}
