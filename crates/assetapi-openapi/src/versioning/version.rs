//! API version type and parsing
//!
//! Versions are `major.minor` pairs. Minor defaults to 0, so `1`, `v1` and
//! `1.0` all name the same version.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A supported API version
///
/// Accepts these token formats:
/// - `v1`, `V2` (major only, prefixed)
/// - `1`, `2` (major only)
/// - `1.0`, `v2.1` (major.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ApiVersion {
    /// Major version number
    pub major: u32,
    /// Minor version number (defaults to 0)
    pub minor: u32,
}

impl ApiVersion {
    /// Create a new version
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Create a version with only a major number
    pub const fn major(major: u32) -> Self {
        Self { major, minor: 0 }
    }

    /// Version 1.0
    pub const fn v1() -> Self {
        Self::major(1)
    }

    /// Version 2.0
    pub const fn v2() -> Self {
        Self::major(2)
    }

    /// Document group name (e.g. "v1", "v1.2")
    ///
    /// Also the token used in versioned URL segments.
    pub fn group_name(&self) -> String {
        if self.minor == 0 {
            format!("v{}", self.major)
        } else {
            format!("v{}.{}", self.major, self.minor)
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for ApiVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(VersionParseError::Empty);
        }

        // Remove optional 'v' prefix
        let s = s
            .strip_prefix('v')
            .or_else(|| s.strip_prefix('V'))
            .unwrap_or(s);

        let parts: Vec<&str> = s.split('.').collect();

        match parts.as_slice() {
            [major] => Ok(ApiVersion::major(parse_component(major)?)),
            [major, minor] => Ok(ApiVersion::new(
                parse_component(major)?,
                parse_component(minor)?,
            )),
            _ => Err(VersionParseError::InvalidFormat),
        }
    }
}

fn parse_component(part: &str) -> Result<u32, VersionParseError> {
    // u32::from_str accepts a leading '+', version tokens do not
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VersionParseError::InvalidNumber);
    }
    part.parse().map_err(|_| VersionParseError::InvalidNumber)
}

impl PartialOrd for ApiVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ApiVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then_with(|| self.minor.cmp(&other.minor))
    }
}

impl Serialize for ApiVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for version parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VersionParseError {
    /// Invalid number in version string
    #[error("invalid number in version")]
    InvalidNumber,
    /// Invalid version format
    #[error("invalid version format")]
    InvalidFormat,
    /// Empty version string
    #[error("empty version string")]
    Empty,
}
