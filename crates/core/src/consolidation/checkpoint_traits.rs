//! Repository seam for period checkpoints.

use async_trait::async_trait;

use super::{PeriodCheckpoint, PeriodType};
use crate::errors::Result;

/// Repository trait for period checkpoints.
///
/// Reading belongs to the query path; writing is owned by the periodic
/// consolidation job, which is outside this crate.
#[async_trait]
pub trait CheckpointRepositoryTrait: Send + Sync {
    /// List checkpoints of one period type for a scope, ordered
    /// ascending by period key. Key bounds are inclusive; `None` bounds
    /// are open-ended.
    async fn list_checkpoints(
        &self,
        scope_id: &str,
        period_type: PeriodType,
        key_start: Option<&str>,
        key_end: Option<&str>,
    ) -> Result<Vec<PeriodCheckpoint>>;

    /// Persist checkpoints produced by the consolidation job.
    async fn save_checkpoints(&self, checkpoints: &[PeriodCheckpoint]) -> Result<()>;
}
