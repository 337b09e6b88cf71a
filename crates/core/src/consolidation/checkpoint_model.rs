//! Consolidated period checkpoint domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Granularity of a consolidated period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Month,
    Year,
}

impl PeriodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodType::Month => "month",
            PeriodType::Year => "year",
        }
    }
}

/// Consolidated figures for one asset (or the whole portfolio) in one
/// currency over one closed period.
///
/// The factor pair is the compounding contract: `end_factor /
/// start_factor` equals the geometric product of `(1 + daily_change /
/// 100)` over the period's valid records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetSummary {
    pub start_factor: Decimal,
    pub end_factor: Decimal,
    pub period_return_pct: Decimal,
    pub start_total_value: Decimal,
    pub end_total_value: Decimal,
    /// Additive over the period's records; signed, negative = inflow.
    pub total_cash_flow: Decimal,
    /// Midpoint-simplified personal return. Exact per-day cash flow
    /// weighting is intentionally not stored at this granularity.
    pub personal_return_pct: Decimal,
    /// Records that actually carried a change percentage.
    pub valid_docs_count: u32,
}

/// Per-currency consolidated figures: portfolio-level summary plus the
/// same shape per asset key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySummary {
    #[serde(flatten)]
    pub summary: AssetSummary,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub per_asset: HashMap<String, AssetSummary>,
}

/// Pre-aggregated summary of one closed month or year.
///
/// A checkpoint is a pure deterministic function of the daily records it
/// summarizes; recomputing one from the same records yields identical
/// fields (`calculated_at` aside).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCheckpoint {
    pub id: String,
    pub scope_id: String,
    pub period_type: PeriodType,
    /// `"2025"` for years, `"2025-03"` for months.
    pub period_key: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Number of daily records folded into this checkpoint.
    pub docs_count: u32,
    pub per_currency: HashMap<String, CurrencySummary>,
    pub calculated_at: DateTime<Utc>,
}
