//! Walks checkpoints and fresh daily records chronologically,
//! accumulating per-window compounding factors and cash flow totals.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::{PeriodWindow, ReturnWindow, TotalValueData, YearPerformance};
use crate::consolidation::{AssetSummary, PeriodCheckpoint};
use crate::records::{DailyRecord, MetricSlice};
use crate::returns::{compound, percent_from_factors, simple_personal_return};

/// What a returns query measures: the whole portfolio, or one asset key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReturnTarget {
    Portfolio,
    Asset(String),
}

/// One chronological unit of the walk: a consolidated period treated as
/// atomic, or a single day.
#[derive(Debug, Clone)]
pub struct ChainUnit {
    pub range_start: NaiveDate,
    pub range_end: NaiveDate,
    /// Multiplicative growth over the unit's range.
    pub factor_ratio: Decimal,
    pub start_value: Option<Decimal>,
    pub end_value: Option<Decimal>,
    pub cash_flow: Decimal,
    pub docs_count: u32,
    pub valid_docs_count: u32,
}

/// Everything one walk produces; the orchestrator only reshapes this
/// into the wire response.
#[derive(Debug)]
pub struct ChainOutcome {
    pub windows: HashMap<ReturnWindow, PeriodWindow>,
    pub performance_by_year: BTreeMap<i32, YearPerformance>,
    pub total_value_data: TotalValueData,
    pub start_date: Option<NaiveDate>,
}

impl ChainOutcome {
    /// Years present in the rollup, ascending.
    pub fn available_years(&self) -> Vec<i32> {
        self.performance_by_year.keys().copied().collect()
    }
}

fn checkpoint_summary<'a>(
    checkpoint: &'a PeriodCheckpoint,
    currency: &str,
    target: &ReturnTarget,
) -> Option<&'a AssetSummary> {
    let currency_summary = checkpoint.per_currency.get(currency)?;
    match target {
        ReturnTarget::Portfolio => Some(&currency_summary.summary),
        ReturnTarget::Asset(key) => currency_summary.per_asset.get(key),
    }
}

fn record_metrics<'a>(
    record: &'a DailyRecord,
    currency: &str,
    target: &ReturnTarget,
) -> Option<&'a MetricSlice> {
    let slice = record.currencies.get(currency)?;
    match target {
        ReturnTarget::Portfolio => Some(&slice.metrics),
        ReturnTarget::Asset(key) => slice.per_asset.get(key),
    }
}

/// Builds the ascending unit sequence: years, then months, then days.
/// Later units multiply onto the factor established by earlier ones, so
/// the ordering is load-bearing. Units whose currency (or asset) slice
/// is absent are skipped without breaking the chain.
pub fn build_units(
    yearly: &[PeriodCheckpoint],
    monthly: &[PeriodCheckpoint],
    daily: &[DailyRecord],
    currency: &str,
    target: &ReturnTarget,
) -> Vec<ChainUnit> {
    let mut units = Vec::with_capacity(yearly.len() + monthly.len() + daily.len());

    for checkpoint in yearly.iter().chain(monthly.iter()) {
        let Some(summary) = checkpoint_summary(checkpoint, currency, target) else {
            continue;
        };
        if summary.start_factor.is_zero() {
            continue;
        }
        units.push(ChainUnit {
            range_start: checkpoint.start_date,
            range_end: checkpoint.end_date,
            factor_ratio: summary.end_factor / summary.start_factor,
            start_value: Some(summary.start_total_value),
            end_value: Some(summary.end_total_value),
            cash_flow: summary.total_cash_flow,
            docs_count: checkpoint.docs_count,
            valid_docs_count: summary.valid_docs_count,
        });
    }

    for record in daily {
        let Some(metrics) = record_metrics(record, currency, target) else {
            continue;
        };
        // A day's own close stands in for both ends of its range, which
        // is consistent with how checkpoints seed their start values.
        units.push(ChainUnit {
            range_start: record.date,
            range_end: record.date,
            factor_ratio: compound(
                Decimal::ONE,
                metrics.adjusted_daily_change_percentage,
            ),
            start_value: metrics.total_value,
            end_value: metrics.total_value,
            cash_flow: metrics.total_cash_flow,
            docs_count: 1,
            valid_docs_count: u32::from(metrics.adjusted_daily_change_percentage.is_some()),
        });
    }

    units
}

/// Runs the chronological walk plus the by-year rollup pass.
pub fn run(units: &[ChainUnit], today: NaiveDate) -> ChainOutcome {
    let mut windows: Vec<PeriodWindow> = ReturnWindow::ALL
        .iter()
        .map(|key| PeriodWindow::new(*key, today))
        .collect();

    let mut chain_factor = Decimal::ONE;
    let mut total_value_data = TotalValueData::default();

    for unit in units {
        // A window is entered at the first unit whose *end* crosses its
        // boundary, even if the unit's own start precedes it. That
        // atomic-checkpoint approximation can mis-weight partial-month
        // boundaries, which is exactly why the current month is kept at
        // daily granularity instead of pre-summarized.
        for window in windows.iter_mut() {
            if !window.found && window.boundary_date <= unit.range_end {
                window.found = true;
                window.start_factor = chain_factor;
                window.current_factor = chain_factor;
                window.start_value = unit.start_value;
            }
        }

        chain_factor *= unit.factor_ratio;

        for window in windows.iter_mut().filter(|window| window.found) {
            window.current_factor = chain_factor;
            if window.start_value.is_none() {
                window.start_value = unit.start_value;
            }
            if unit.end_value.is_some() {
                window.end_value = unit.end_value;
            }
            window.total_cash_flow += unit.cash_flow;
            window.docs_count += unit.docs_count;
            window.valid_docs_count += unit.valid_docs_count;
        }

        if let Some(value) = unit.end_value {
            total_value_data.dates.push(unit.range_end);
            total_value_data.values.push(value);
            total_value_data
                .percent_changes
                .push(percent_from_factors(Decimal::ONE, unit.factor_ratio));
        }
    }
    total_value_data.overall_percent_change =
        percent_from_factors(Decimal::ONE, chain_factor);

    ChainOutcome {
        windows: windows
            .into_iter()
            .map(|window| (window.key, window))
            .collect(),
        performance_by_year: rollup_by_year(units),
        total_value_data,
        start_date: units.first().map(|unit| unit.range_start),
    }
}

/// Fold state for one calendar month (or a whole checkpoint-only year).
#[derive(Debug)]
struct BucketAccumulator {
    factor: Decimal,
    start_value: Option<Decimal>,
    end_value: Option<Decimal>,
    cash_flow: Decimal,
}

impl BucketAccumulator {
    fn new() -> Self {
        Self {
            factor: Decimal::ONE,
            start_value: None,
            end_value: None,
            cash_flow: Decimal::ZERO,
        }
    }

    fn absorb(&mut self, unit: &ChainUnit) {
        self.factor *= unit.factor_ratio;
        if self.start_value.is_none() {
            self.start_value = unit.start_value;
        }
        if unit.end_value.is_some() {
            self.end_value = unit.end_value;
        }
        self.cash_flow += unit.cash_flow;
    }

    fn personal_return_pct(&self) -> Decimal {
        simple_personal_return(
            self.start_value.unwrap_or(Decimal::ZERO),
            self.end_value.unwrap_or(Decimal::ZERO),
            self.cash_flow,
        )
    }
}

/// Second pass over the same units, grouped by (year, month) instead of
/// by window. Units spanning a whole year (yearly checkpoints) land in
/// the year bucket without a monthly breakdown.
fn rollup_by_year(units: &[ChainUnit]) -> BTreeMap<i32, YearPerformance> {
    // Month 0 holds year-spanning units; it sorts ahead of real months,
    // which keeps the per-year fold chronological.
    let mut buckets: BTreeMap<(i32, u32), BucketAccumulator> = BTreeMap::new();
    for unit in units {
        let year = unit.range_start.year();
        let month = if year == unit.range_end.year()
            && unit.range_start.month() == unit.range_end.month()
        {
            unit.range_start.month()
        } else {
            0
        };
        buckets
            .entry((year, month))
            .or_insert_with(BucketAccumulator::new)
            .absorb(unit);
    }

    let mut years: BTreeMap<i32, YearPerformance> = BTreeMap::new();
    let mut year_totals: BTreeMap<i32, BucketAccumulator> = BTreeMap::new();

    for ((year, month), bucket) in buckets {
        let entry = years.entry(year).or_default();
        if month >= 1 {
            entry
                .months
                .insert(month, percent_from_factors(Decimal::ONE, bucket.factor));
            entry
                .personal_months
                .insert(month, bucket.personal_return_pct());
        }

        let total = year_totals
            .entry(year)
            .or_insert_with(BucketAccumulator::new);
        total.factor *= bucket.factor;
        if total.start_value.is_none() {
            total.start_value = bucket.start_value;
        }
        if bucket.end_value.is_some() {
            total.end_value = bucket.end_value;
        }
        total.cash_flow += bucket.cash_flow;
    }

    for (year, total) in year_totals {
        if let Some(entry) = years.get_mut(&year) {
            entry.total = percent_from_factors(Decimal::ONE, total.factor);
            entry.personal_total = total.personal_return_pct();
        }
    }

    years
}
