//! Merges N per-account daily record series into one value-weighted
//! synthetic series, consumable identically to a single-account series.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::{BTreeMap, HashMap};

use crate::records::{CurrencySlice, DailyRecord, MetricSlice};

const HUNDRED: Decimal = dec!(100);

/// Merge state for one metric slice on one date.
///
/// The combined day change is weighted by each account's pre-change
/// (opening) value `value / (1 + pct/100)` - never by the post-change
/// value, which would bake the very change being measured into its own
/// weight.
#[derive(Debug, Default)]
struct MetricMerge {
    total_value: Option<Decimal>,
    total_investment: Option<Decimal>,
    total_cash_flow: Decimal,
    weighted_change: Decimal,
    opening_value: Decimal,
    has_change: bool,
}

impl MetricMerge {
    fn absorb(&mut self, slice: &MetricSlice) {
        if let Some(value) = slice.total_value {
            *self.total_value.get_or_insert(Decimal::ZERO) += value;
        }
        if let Some(investment) = slice.total_investment {
            *self.total_investment.get_or_insert(Decimal::ZERO) += investment;
        }
        self.total_cash_flow += slice.total_cash_flow;

        if let (Some(value), Some(pct)) =
            (slice.total_value, slice.adjusted_daily_change_percentage)
        {
            let divisor = Decimal::ONE + pct / HUNDRED;
            let opening = if pct.is_zero() || divisor.is_zero() {
                value
            } else {
                value / divisor
            };
            self.weighted_change += opening * pct;
            self.opening_value += opening;
            self.has_change = true;
        }
    }

    fn finalize(self) -> MetricSlice {
        // No account carried a change percentage: the merged day stays a
        // missing-data day rather than a fabricated 0% one.
        let adjusted_daily_change_percentage = if !self.has_change {
            None
        } else if self.opening_value.is_zero() {
            Some(Decimal::ZERO)
        } else {
            Some(self.weighted_change / self.opening_value)
        };

        MetricSlice {
            total_value: self.total_value,
            total_investment: self.total_investment,
            total_cash_flow: self.total_cash_flow,
            adjusted_daily_change_percentage,
        }
    }
}

#[derive(Debug, Default)]
struct CurrencyMerge {
    metrics: MetricMerge,
    per_asset: HashMap<String, MetricMerge>,
}

impl CurrencyMerge {
    fn absorb(&mut self, slice: &CurrencySlice) {
        self.metrics.absorb(&slice.metrics);
        for (asset_key, asset_slice) in &slice.per_asset {
            self.per_asset
                .entry(asset_key.clone())
                .or_default()
                .absorb(asset_slice);
        }
    }

    fn finalize(self) -> CurrencySlice {
        CurrencySlice {
            metrics: self.metrics.finalize(),
            per_asset: self
                .per_asset
                .into_iter()
                .map(|(key, merge)| (key, merge.finalize()))
                .collect(),
        }
    }
}

/// Merges per-account series over the union of their dates. Accounts
/// absent on a date contribute nothing to it - not zero.
pub fn aggregate_accounts(series: &[Vec<DailyRecord>]) -> Vec<DailyRecord> {
    let mut by_date: BTreeMap<chrono::NaiveDate, HashMap<String, CurrencyMerge>> = BTreeMap::new();

    for account in series {
        for record in account {
            let merges = by_date.entry(record.date).or_default();
            for (currency, slice) in &record.currencies {
                merges.entry(currency.clone()).or_default().absorb(slice);
            }
        }
    }

    by_date
        .into_iter()
        .map(|(date, merges)| DailyRecord {
            date,
            currencies: merges
                .into_iter()
                .map(|(currency, merge)| (currency, merge.finalize()))
                .collect(),
        })
        .collect()
}
