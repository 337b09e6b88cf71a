//! Folds a contiguous run of daily records for one closed period into a
//! `PeriodCheckpoint`.

use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{AssetSummary, CurrencySummary, PeriodCheckpoint, PeriodType};
use crate::records::{DailyRecord, MetricSlice};
use crate::returns::{compound, percent_from_factors, simple_personal_return};
use crate::utils::time_utils;

/// Single-pass fold state for one currency or asset key.
///
/// Seeding and compounding follow different rules on purpose: values
/// seed on the first record that carries one and end values overwrite
/// unconditionally (sparse calendars), while the factor compounds only
/// on records that carry a change percentage.
#[derive(Debug)]
struct PeriodAccumulator {
    factor: Decimal,
    start_value: Option<Decimal>,
    end_value: Decimal,
    total_cash_flow: Decimal,
    valid_docs_count: u32,
}

impl PeriodAccumulator {
    fn new() -> Self {
        Self {
            factor: Decimal::ONE,
            start_value: None,
            end_value: Decimal::ZERO,
            total_cash_flow: Decimal::ZERO,
            valid_docs_count: 0,
        }
    }

    fn observe(&mut self, slice: &MetricSlice) {
        if let Some(value) = slice.total_value {
            if self.start_value.is_none() {
                self.start_value = Some(value);
            }
            self.end_value = value;
        }
        if let Some(pct) = slice.adjusted_daily_change_percentage {
            self.factor = compound(self.factor, Some(pct));
            self.valid_docs_count += 1;
        }
        self.total_cash_flow += slice.total_cash_flow;
    }

    /// `None` when no record ever set a value, or none carried a change
    /// percentage. Callers skip such keys silently.
    fn finalize(self) -> Option<AssetSummary> {
        let start_total_value = self.start_value?;
        if self.valid_docs_count == 0 {
            return None;
        }
        Some(AssetSummary {
            start_factor: Decimal::ONE,
            end_factor: self.factor,
            period_return_pct: percent_from_factors(Decimal::ONE, self.factor),
            start_total_value,
            end_total_value: self.end_value,
            total_cash_flow: self.total_cash_flow,
            personal_return_pct: simple_personal_return(
                start_total_value,
                self.end_value,
                self.total_cash_flow,
            ),
            valid_docs_count: self.valid_docs_count,
        })
    }
}

/// Consolidates the ordered daily records of one closed period into a
/// checkpoint. Returns `None` when nothing in the period is usable.
pub fn consolidate_period(
    scope_id: &str,
    period_type: PeriodType,
    period_key: &str,
    records: &[DailyRecord],
) -> Option<PeriodCheckpoint> {
    let (first, last) = match (records.first(), records.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return None,
    };

    // Union of currency keys seen anywhere in the period; a currency
    // missing on an individual record is skipped, not an error.
    let currencies: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.currencies.keys().map(String::as_str))
        .collect();

    let mut per_currency = HashMap::new();
    for currency in currencies {
        let mut portfolio = PeriodAccumulator::new();
        let mut assets: HashMap<String, PeriodAccumulator> = HashMap::new();

        for record in records {
            let Some(slice) = record.currencies.get(currency) else {
                continue;
            };
            portfolio.observe(&slice.metrics);
            // Assets may appear or disappear mid-period; each key folds
            // independently over the records where it is present.
            for (asset_key, asset_slice) in &slice.per_asset {
                assets
                    .entry(asset_key.clone())
                    .or_insert_with(PeriodAccumulator::new)
                    .observe(asset_slice);
            }
        }

        let Some(summary) = portfolio.finalize() else {
            debug!(
                "Skipping currency {} for period {}: no usable records",
                currency, period_key
            );
            continue;
        };
        let per_asset = assets
            .into_iter()
            .filter_map(|(key, accumulator)| {
                accumulator.finalize().map(|summary| (key, summary))
            })
            .collect();

        per_currency.insert(
            currency.to_string(),
            CurrencySummary { summary, per_asset },
        );
    }

    if per_currency.is_empty() {
        return None;
    }

    Some(PeriodCheckpoint {
        id: format!("{}_{}_{}", scope_id, period_type.as_str(), period_key),
        scope_id: scope_id.to_string(),
        period_type,
        period_key: period_key.to_string(),
        start_date: first.date,
        end_date: last.date,
        docs_count: records.len() as u32,
        per_currency,
        calculated_at: Utc::now(),
    })
}

/// Groups ordered daily records by the period of `period_type` they
/// fall into, keyed by period key. Used by the consolidation job and by
/// tests that rebuild checkpoints from raw history.
pub fn split_by_period(
    records: &[DailyRecord],
    period_type: PeriodType,
) -> BTreeMap<String, Vec<DailyRecord>> {
    let mut groups: BTreeMap<String, Vec<DailyRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry(time_utils::period_key(period_type, record.date))
            .or_default()
            .push(record.clone());
    }
    groups
}
