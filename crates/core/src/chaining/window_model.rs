//! Query-scoped return windows and their accumulators.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::returns::{percent_from_factors, simple_personal_return};
use crate::utils::time_utils;

/// The seven reporting windows a returns query answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReturnWindow {
    OneMonth,
    ThreeMonths,
    SixMonths,
    YearToDate,
    OneYear,
    TwoYears,
    FiveYears,
}

impl ReturnWindow {
    pub const ALL: [ReturnWindow; 7] = [
        ReturnWindow::OneMonth,
        ReturnWindow::ThreeMonths,
        ReturnWindow::SixMonths,
        ReturnWindow::YearToDate,
        ReturnWindow::OneYear,
        ReturnWindow::TwoYears,
        ReturnWindow::FiveYears,
    ];

    /// Short label used in per-window doc counts.
    pub fn label(&self) -> &'static str {
        match self {
            ReturnWindow::OneMonth => "1M",
            ReturnWindow::ThreeMonths => "3M",
            ReturnWindow::SixMonths => "6M",
            ReturnWindow::YearToDate => "YTD",
            ReturnWindow::OneYear => "1Y",
            ReturnWindow::TwoYears => "2Y",
            ReturnWindow::FiveYears => "5Y",
        }
    }

    /// First calendar date included in the window ending on `today`.
    pub fn boundary_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            ReturnWindow::YearToDate => time_utils::year_start(today),
            ReturnWindow::OneMonth => time_utils::months_back(today, 1),
            ReturnWindow::ThreeMonths => time_utils::months_back(today, 3),
            ReturnWindow::SixMonths => time_utils::months_back(today, 6),
            ReturnWindow::OneYear => time_utils::months_back(today, 12),
            ReturnWindow::TwoYears => time_utils::months_back(today, 24),
            ReturnWindow::FiveYears => time_utils::months_back(today, 60),
        }
    }
}

/// Per-window accumulator, built fresh for each query and mutated during
/// a single chronological walk.
///
/// `found` is set exactly once, at the first unit intersecting the
/// window. `found == false` after the walk means "insufficient history",
/// which is distinct from a genuine 0% return.
#[derive(Debug, Clone)]
pub struct PeriodWindow {
    pub key: ReturnWindow,
    pub boundary_date: NaiveDate,
    /// Global chain factor at the point the window was entered (not
    /// reset to 1).
    pub start_factor: Decimal,
    pub current_factor: Decimal,
    pub found: bool,
    pub start_value: Option<Decimal>,
    pub end_value: Option<Decimal>,
    pub total_cash_flow: Decimal,
    pub docs_count: u32,
    pub valid_docs_count: u32,
}

impl PeriodWindow {
    pub fn new(key: ReturnWindow, today: NaiveDate) -> Self {
        Self {
            key,
            boundary_date: key.boundary_date(today),
            start_factor: Decimal::ONE,
            current_factor: Decimal::ONE,
            found: false,
            start_value: None,
            end_value: None,
            total_cash_flow: Decimal::ZERO,
            docs_count: 0,
            valid_docs_count: 0,
        }
    }

    /// Time-weighted return over the window, in percent units.
    pub fn return_pct(&self) -> Decimal {
        percent_from_factors(self.start_factor, self.current_factor)
    }

    /// Money-weighted return at this granularity (not day-weighted).
    pub fn personal_return_pct(&self) -> Decimal {
        simple_personal_return(
            self.start_value.unwrap_or(Decimal::ZERO),
            self.end_value.unwrap_or(Decimal::ZERO),
            self.total_cash_flow,
        )
    }
}

/// Per-year rollup: monthly percentages where monthly granularity is
/// available, plus the compounded annual figures.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct YearPerformance {
    /// Month number (1..=12) to time-weighted percentage.
    pub months: BTreeMap<u32, Decimal>,
    pub personal_months: BTreeMap<u32, Decimal>,
    pub total: Decimal,
    pub personal_total: Decimal,
}

/// Chart-ready value series covering the whole walk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TotalValueData {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Decimal>,
    /// Per-unit return percentage, aligned with `dates`.
    pub percent_changes: Vec<Decimal>,
    pub overall_percent_change: Decimal,
}
