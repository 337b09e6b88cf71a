//! Wire models for the returns query.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::chaining::{TotalValueData, YearPerformance};

/// Flat per-window returns block. Both query paths produce exactly this
/// shape; `has_*_data == false` means "insufficient history", which is
/// distinct from a genuine 0% return.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsSummary {
    pub one_month_return: Decimal,
    pub one_month_personal_return: Decimal,
    pub has_one_month_data: bool,
    pub three_months_return: Decimal,
    pub three_months_personal_return: Decimal,
    pub has_three_months_data: bool,
    pub six_months_return: Decimal,
    pub six_months_personal_return: Decimal,
    pub has_six_months_data: bool,
    pub year_to_date_return: Decimal,
    pub year_to_date_personal_return: Decimal,
    pub has_year_to_date_data: bool,
    pub one_year_return: Decimal,
    pub one_year_personal_return: Decimal,
    pub has_one_year_data: bool,
    pub two_years_return: Decimal,
    pub two_years_personal_return: Decimal,
    pub has_two_years_data: bool,
    pub five_years_return: Decimal,
    pub five_years_personal_return: Decimal,
    pub has_five_years_data: bool,
}

/// Which path produced the response and what it cost.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMetadata {
    pub version: String,
    pub docs_read: u32,
    /// Wall-clock duration in milliseconds.
    pub duration: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Full response of a returns query. Identical shape on both paths;
/// only `_metadata` tells them apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnsResponse {
    pub returns: ReturnsSummary,
    /// Window label ("1M", "YTD", ...) to valid record count.
    pub valid_docs_count_by_period: BTreeMap<String, u32>,
    pub total_value_data: TotalValueData,
    pub performance_by_year: BTreeMap<i32, YearPerformance>,
    pub available_years: Vec<i32>,
    pub start_date: Option<NaiveDate>,
    #[serde(rename = "_metadata")]
    pub metadata: ResponseMetadata,
}
