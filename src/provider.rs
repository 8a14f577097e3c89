//! Provider abstraction for fetching asset data from external APIs

use crate::{error::ProviderError, types::Asset};
use async_trait::async_trait;

/// Trait for asset data providers
///
/// The store only talks to this trait, so tests swap in the scripted mock
/// below and production code uses [`crate::providers::CoinCapProvider`].
#[async_trait]
pub trait AssetProvider: Send + Sync {
    /// Fetches the full asset list in server order
    async fn fetch_assets(&self) -> Result<Vec<Asset>, ProviderError>;

    /// Fetches a single asset by identifier
    ///
    /// # Arguments
    /// * `id` - The asset slug, e.g. "bitcoin"
    async fn fetch_asset(&self, id: &str) -> Result<Asset, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
