//! Asset store seam
//!
//! Persistence is not this crate's concern: handlers talk to an
//! [`AssetService`] and treat its latency and failures as opaque.
//! [`InMemoryAssetService`] is the process-local implementation used by the
//! default wiring and by tests.

use crate::domain::{Asset, AssetId, AssetStatus, AssetUpdate, RetirementChange};
use dashmap::DashMap;

/// Domain operations on assets
pub trait AssetService: Send + Sync {
    /// Fetch one asset
    fn get(&self, id: &AssetId) -> Result<Asset, ServiceError>;

    /// Apply an update and return the resulting asset
    fn update(&self, id: &AssetId, update: AssetUpdate) -> Result<Asset, ServiceError>;
}

/// Failure reported by an asset service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// No asset with this id
    #[error("asset {0} not found")]
    NotFound(AssetId),
    /// The store refused the operation
    #[error("asset {id} update rejected: {reason}")]
    Rejected { id: AssetId, reason: String },
}

/// Asset store backed by a concurrent map
///
/// `update` upserts. Supplied fields replace stored ones. The retirement
/// date follows [`RetirementChange`], and moving to a non-terminal status
/// always clears it.
#[derive(Debug, Default)]
pub struct InMemoryAssetService {
    assets: DashMap<AssetId, Asset>,
}

impl InMemoryAssetService {
    /// Empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with assets
    pub fn with_assets(assets: impl IntoIterator<Item = Asset>) -> Self {
        let service = Self::new();
        for asset in assets {
            service.assets.insert(asset.id.clone(), asset);
        }
        service
    }

    /// Number of stored assets
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetService for InMemoryAssetService {
    fn get(&self, id: &AssetId) -> Result<Asset, ServiceError> {
        self.assets
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    fn update(&self, id: &AssetId, update: AssetUpdate) -> Result<Asset, ServiceError> {
        if update.retired_on.date().is_some() && !update.status.is_terminal() {
            return Err(ServiceError::Rejected {
                id: id.clone(),
                reason: format!(
                    "retirement date requires a terminal status, got {}",
                    update.status
                ),
            });
        }

        let mut entry = self
            .assets
            .entry(id.clone())
            .or_insert_with(|| Asset::new(id.clone(), AssetStatus::Active));
        let asset = entry.value_mut();

        asset.status = update.status;
        asset.notes = update.notes;
        asset.value = update.value;
        asset.retired_on = match update.retired_on {
            _ if !asset.status.is_terminal() => None,
            RetirementChange::Keep => asset.retired_on,
            RetirementChange::Clear => None,
            RetirementChange::Set(date) => Some(date),
        };

        Ok(asset.clone())
    }
}
