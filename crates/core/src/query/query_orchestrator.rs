//! Decides consolidated-path vs. full-scan fallback, fetches inputs
//! concurrently and normalizes the output shape.

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::chaining::{build_units, run, ChainOutcome, ReturnTarget, ReturnWindow};
use crate::consolidation::{CheckpointRepositoryTrait, PeriodType};
use crate::constants::{
    AGGREGATE_VERSION, CONSOLIDATED_VERSION, DECIMAL_PRECISION, FALLBACK_VERSION,
};
use crate::aggregation::aggregate_accounts;
use crate::errors::Result;
use crate::records::DailyRecordRepositoryTrait;
use crate::utils::time_utils;

use super::{ResponseMetadata, ReturnsResponse, ReturnsSummary};

/// One returns query: a scope (account or overall view), a currency and
/// a target, evaluated as of `today`.
#[derive(Debug, Clone)]
pub struct ReturnsQuery {
    pub scope_id: String,
    pub currency: String,
    pub target: ReturnTarget,
    pub today: NaiveDate,
}

#[async_trait]
pub trait ReturnsQueryServiceTrait: Send + Sync {
    /// Answers a returns query, preferring the consolidated path and
    /// degrading to the full-scan fallback when no checkpoints exist.
    async fn calculate_returns(&self, query: &ReturnsQuery) -> Result<ReturnsResponse>;

    /// Answers a returns query for the synthetic all-accounts view by
    /// merging the per-account daily series.
    async fn calculate_overall_returns(
        &self,
        scope_ids: &[String],
        query: &ReturnsQuery,
    ) -> Result<ReturnsResponse>;
}

pub struct QueryOrchestrator {
    daily_records: Arc<dyn DailyRecordRepositoryTrait>,
    checkpoints: Arc<dyn CheckpointRepositoryTrait>,
}

impl QueryOrchestrator {
    pub fn new(
        daily_records: Arc<dyn DailyRecordRepositoryTrait>,
        checkpoints: Arc<dyn CheckpointRepositoryTrait>,
    ) -> Self {
        Self {
            daily_records,
            checkpoints,
        }
    }

    /// Consolidated path: three independent fetches issued concurrently,
    /// then one chain over years -> months -> current-month days.
    /// `Ok(None)` means no checkpoints exist and the caller should fall
    /// back; I/O errors propagate unchanged.
    async fn consolidated_path(
        &self,
        query: &ReturnsQuery,
    ) -> Result<Option<(ChainOutcome, u32)>> {
        let plan = time_utils::consolidated_fetch_plan(query.today);

        let (yearly, monthly, daily) = tokio::try_join!(
            self.checkpoints.list_checkpoints(
                &query.scope_id,
                PeriodType::Year,
                None,
                Some(plan.yearly_key_end.as_str()),
            ),
            self.checkpoints.list_checkpoints(
                &query.scope_id,
                PeriodType::Month,
                Some(plan.monthly_key_start.as_str()),
                Some(plan.monthly_key_end.as_str()),
            ),
            self.daily_records.list_daily_records(
                &query.scope_id,
                Some(plan.current_month_start),
                Some(query.today),
            ),
        )?;

        if yearly.is_empty() && monthly.is_empty() {
            return Ok(None);
        }

        let docs_read = (yearly.len() + monthly.len() + daily.len()) as u32;
        let units = build_units(&yearly, &monthly, &daily, &query.currency, &query.target);
        Ok(Some((run(&units, query.today), docs_read)))
    }

    /// Full-scan fallback: the same chain math over the entire daily
    /// history at single granularity.
    async fn fallback_path(
        &self,
        query: &ReturnsQuery,
        started: Instant,
        reason: &str,
    ) -> Result<ReturnsResponse> {
        let daily = self
            .daily_records
            .list_daily_records(&query.scope_id, None, Some(query.today))
            .await?;
        let docs_read = daily.len() as u32;
        let units = build_units(&[], &[], &daily, &query.currency, &query.target);
        let outcome = run(&units, query.today);
        Ok(assemble_response(
            outcome,
            docs_read,
            started,
            FALLBACK_VERSION,
            Some(reason.to_string()),
        ))
    }
}

#[async_trait]
impl ReturnsQueryServiceTrait for QueryOrchestrator {
    async fn calculate_returns(&self, query: &ReturnsQuery) -> Result<ReturnsResponse> {
        let started = Instant::now();

        match self.consolidated_path(query).await? {
            Some((outcome, docs_read)) => Ok(assemble_response(
                outcome,
                docs_read,
                started,
                CONSOLIDATED_VERSION,
                None,
            )),
            None => {
                debug!(
                    "No checkpoints for scope '{}'; using full-scan fallback",
                    query.scope_id
                );
                self.fallback_path(query, started, "no checkpoints available")
                    .await
            }
        }
    }

    async fn calculate_overall_returns(
        &self,
        scope_ids: &[String],
        query: &ReturnsQuery,
    ) -> Result<ReturnsResponse> {
        let started = Instant::now();

        if scope_ids.is_empty() {
            warn!("Overall returns requested with no account scopes");
        }
        let fetches = scope_ids.iter().map(|scope_id| {
            self.daily_records
                .list_daily_records(scope_id, None, Some(query.today))
        });
        let series = futures::future::try_join_all(fetches).await?;

        let docs_read = series.iter().map(Vec::len).sum::<usize>() as u32;
        let merged = aggregate_accounts(&series);
        let units = build_units(&[], &[], &merged, &query.currency, &query.target);
        let outcome = run(&units, query.today);
        Ok(assemble_response(
            outcome,
            docs_read,
            started,
            AGGREGATE_VERSION,
            None,
        ))
    }
}

fn window_figures(outcome: &ChainOutcome, key: ReturnWindow) -> (Decimal, Decimal, bool) {
    match outcome.windows.get(&key) {
        Some(window) if window.found => (
            window.return_pct().round_dp(DECIMAL_PRECISION),
            window.personal_return_pct().round_dp(DECIMAL_PRECISION),
            true,
        ),
        _ => (Decimal::ZERO, Decimal::ZERO, false),
    }
}

/// Normalizes a chain outcome into the wire shape. Both paths go
/// through here, which is what keeps their output identical.
fn assemble_response(
    outcome: ChainOutcome,
    docs_read: u32,
    started: Instant,
    version: &str,
    reason: Option<String>,
) -> ReturnsResponse {
    let (one_month_return, one_month_personal_return, has_one_month_data) =
        window_figures(&outcome, ReturnWindow::OneMonth);
    let (three_months_return, three_months_personal_return, has_three_months_data) =
        window_figures(&outcome, ReturnWindow::ThreeMonths);
    let (six_months_return, six_months_personal_return, has_six_months_data) =
        window_figures(&outcome, ReturnWindow::SixMonths);
    let (year_to_date_return, year_to_date_personal_return, has_year_to_date_data) =
        window_figures(&outcome, ReturnWindow::YearToDate);
    let (one_year_return, one_year_personal_return, has_one_year_data) =
        window_figures(&outcome, ReturnWindow::OneYear);
    let (two_years_return, two_years_personal_return, has_two_years_data) =
        window_figures(&outcome, ReturnWindow::TwoYears);
    let (five_years_return, five_years_personal_return, has_five_years_data) =
        window_figures(&outcome, ReturnWindow::FiveYears);

    let valid_docs_count_by_period: BTreeMap<String, u32> = ReturnWindow::ALL
        .iter()
        .map(|key| {
            let count = outcome
                .windows
                .get(key)
                .map_or(0, |window| window.valid_docs_count);
            (key.label().to_string(), count)
        })
        .collect();

    ReturnsResponse {
        returns: ReturnsSummary {
            one_month_return,
            one_month_personal_return,
            has_one_month_data,
            three_months_return,
            three_months_personal_return,
            has_three_months_data,
            six_months_return,
            six_months_personal_return,
            has_six_months_data,
            year_to_date_return,
            year_to_date_personal_return,
            has_year_to_date_data,
            one_year_return,
            one_year_personal_return,
            has_one_year_data,
            two_years_return,
            two_years_personal_return,
            has_two_years_data,
            five_years_return,
            five_years_personal_return,
            has_five_years_data,
        },
        valid_docs_count_by_period,
        available_years: outcome.available_years(),
        performance_by_year: outcome.performance_by_year,
        total_value_data: outcome.total_value_data,
        start_date: outcome.start_date,
        metadata: ResponseMetadata {
            version: version.to_string(),
            docs_read,
            duration: started.elapsed().as_millis() as u64,
            reason,
        },
    }
}
