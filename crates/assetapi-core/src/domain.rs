//! Asset domain model
//!
//! Version-independent representation of an asset. Wire shapes live in
//! [`crate::mapper`] and never leak in here.

use assetapi_openapi::Schema;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque asset identifier
///
/// Equality is by the underlying string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle state of an asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Schema)]
pub enum AssetStatus {
    Active,
    Inactive,
    InMaintenance,
    Retired,
}

impl AssetStatus {
    /// Every status, in declaration order
    pub const ALL: [AssetStatus; 4] = [
        AssetStatus::Active,
        AssetStatus::Inactive,
        AssetStatus::InMaintenance,
        AssetStatus::Retired,
    ];

    /// Wire token for this status
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::InMaintenance => "InMaintenance",
            Self::Retired => "Retired",
        }
    }

    /// Whether the asset has reached a terminal state
    ///
    /// Only terminal assets carry a retirement date.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Retired)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

/// A status token outside the declared set
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown asset status {0:?}")]
pub struct UnknownStatus(pub String);

/// Currency-agnostic monetary amount
///
/// Always finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Money(f64);

impl Money {
    /// Validate an amount
    pub fn new(amount: f64) -> Result<Self, InvalidMoney> {
        if !amount.is_finite() {
            return Err(InvalidMoney::NotFinite);
        }
        if amount < 0.0 {
            return Err(InvalidMoney::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// The amount
    pub fn amount(&self) -> f64 {
        self.0
    }
}

/// Why an amount is not valid money
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum InvalidMoney {
    #[error("amount must be a finite number")]
    NotFinite,
    #[error("amount must not be negative, got {0}")]
    Negative(f64),
}

/// Internal asset record
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    pub status: AssetStatus,
    pub notes: Option<String>,
    pub value: Option<Money>,
    /// Set only once the asset is in a terminal state
    pub retired_on: Option<NaiveDate>,
}

impl Asset {
    /// A fresh asset with only an id and a status
    pub fn new(id: AssetId, status: AssetStatus) -> Self {
        Self {
            id,
            status,
            notes: None,
            value: None,
            retired_on: None,
        }
    }
}

/// What an update does to the stored retirement date
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RetirementChange {
    /// Leave the stored date alone; also what a version without the field sends
    #[default]
    Keep,
    /// Remove the stored date
    Clear,
    /// Store this date
    Set(NaiveDate),
}

impl RetirementChange {
    /// The date being set, if any
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Set(date) => Some(*date),
            Self::Keep | Self::Clear => None,
        }
    }
}

/// Input of the update operation, decoded from any API version
#[derive(Debug, Clone, PartialEq)]
pub struct AssetUpdate {
    pub status: AssetStatus,
    pub notes: Option<String>,
    pub value: Option<Money>,
    pub retired_on: RetirementChange,
}

impl AssetUpdate {
    /// Update that sets only the status
    pub fn status(status: AssetStatus) -> Self {
        Self {
            status,
            notes: None,
            value: None,
            retired_on: RetirementChange::Keep,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tokens_round_trip() {
        for status in AssetStatus::ALL {
            assert_eq!(status.as_str().parse::<AssetStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_tokens() {
        assert_eq!(
            "active".parse::<AssetStatus>(),
            Err(UnknownStatus("active".to_string()))
        );
        assert!("Lost".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn test_only_retired_is_terminal() {
        let terminal: Vec<_> = AssetStatus::ALL
            .into_iter()
            .filter(AssetStatus::is_terminal)
            .collect();
        assert_eq!(terminal, vec![AssetStatus::Retired]);
    }

    #[test]
    fn test_money_validation() {
        assert_eq!(Money::new(100.0).map(|m| m.amount()), Ok(100.0));
        assert_eq!(Money::new(0.0).map(|m| m.amount()), Ok(0.0));
        assert_eq!(Money::new(-1.5), Err(InvalidMoney::Negative(-1.5)));
        assert_eq!(Money::new(f64::NAN), Err(InvalidMoney::NotFinite));
        assert_eq!(Money::new(f64::INFINITY), Err(InvalidMoney::NotFinite));
    }

    #[test]
    fn test_asset_id_equality_by_value() {
        assert_eq!(AssetId::new("42"), AssetId::from("42"));
        assert_ne!(AssetId::new("42"), AssetId::new("43"));
        assert_eq!(AssetId::new("42").to_string(), "42");
    }

    #[test]
    fn test_status_only_update_keeps_retirement() {
        let update = AssetUpdate::status(AssetStatus::Retired);
        assert_eq!(update.retired_on, RetirementChange::Keep);
        assert_eq!(update.retired_on.date(), None);

        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(RetirementChange::Set(date).date(), Some(date));
    }
}
