//! Repository seam for daily performance records.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::DailyRecord;
use crate::errors::Result;

/// Repository trait for reading already-computed daily records.
///
/// Implementations live in the storage layer (document store); the
/// engine only ever reads. Transient I/O failures surface as
/// `Error::Repository` and propagate to the orchestrator unchanged.
#[async_trait]
pub trait DailyRecordRepositoryTrait: Send + Sync {
    /// List records for a scope ordered ascending by date.
    /// `None` bounds are open-ended.
    async fn list_daily_records(
        &self,
        scope_id: &str,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<DailyRecord>>;
}
