//! Calendar helpers for period keys, window boundaries and fetch planning.

use chrono::{Datelike, Months, NaiveDate};

use crate::constants::MONTHLY_CONSOLIDATION_YEARS;
use crate::consolidation::PeriodType;

/// Key of a yearly period, e.g. `"2025"`.
pub fn year_key(year: i32) -> String {
    format!("{:04}", year)
}

/// Key of the monthly period containing `date`, e.g. `"2025-03"`.
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Key of the period of `period_type` containing `date`.
pub fn period_key(period_type: PeriodType, date: NaiveDate) -> String {
    match period_type {
        PeriodType::Year => year_key(date.year()),
        PeriodType::Month => month_key(date),
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

/// January 1st of the year containing `date`.
pub fn year_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date)
}

/// `date` moved back by whole calendar months, clamped to valid
/// month-end days by chrono (e.g. Mar 31 - 1 month = Feb 28/29).
pub fn months_back(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(months)).unwrap_or(date)
}

/// Which pre-aggregated inputs a consolidated-path query needs.
///
/// The three ranges are contiguous and non-overlapping: yearly
/// checkpoints for old fully-closed years, monthly checkpoints for the
/// closed months of the recent years, and raw daily records for the
/// current (never consolidated) calendar month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedFetchPlan {
    /// Inclusive upper bound on yearly period keys.
    pub yearly_key_end: String,
    /// Inclusive lower bound on monthly period keys.
    pub monthly_key_start: String,
    /// Inclusive upper bound on monthly period keys (the last closed month).
    pub monthly_key_end: String,
    /// First day of the current month; daily records are read from here.
    pub current_month_start: NaiveDate,
}

pub fn consolidated_fetch_plan(today: NaiveDate) -> ConsolidatedFetchPlan {
    let monthly_floor_year = today.year() - MONTHLY_CONSOLIDATION_YEARS;
    let current_month_start = month_start(today);
    let last_closed_month = months_back(current_month_start, 1);

    ConsolidatedFetchPlan {
        yearly_key_end: year_key(monthly_floor_year - 1),
        monthly_key_start: format!("{:04}-01", monthly_floor_year),
        monthly_key_end: month_key(last_closed_month),
        current_month_start,
    }
}
