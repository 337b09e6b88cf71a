//! Cache seam layered above the engine by callers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ReturnsResponse;
use crate::errors::Result;

/// Composite identity of a cached returns response.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsCacheKey {
    pub scope_id: String,
    pub currency: String,
    /// Asset key for single-asset queries, `None` for the portfolio.
    pub asset_key: Option<String>,
}

/// A cached response with its expiry stamp. TTL policy (shorter during
/// market hours) is the cache implementation's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedReturns {
    pub response: ReturnsResponse,
    pub expires_at: DateTime<Utc>,
}

/// Read-through cache for returns responses.
///
/// This sits *above* the engine: the orchestrator never reads or writes
/// it. It is defined here so callers and the engine agree on the key
/// and payload shapes.
#[async_trait]
pub trait ReturnsCacheTrait: Send + Sync {
    async fn get(&self, key: &ReturnsCacheKey) -> Result<Option<CachedReturns>>;
    async fn set(&self, key: &ReturnsCacheKey, entry: CachedReturns) -> Result<()>;
    async fn invalidate(&self, key: &ReturnsCacheKey) -> Result<()>;
}
