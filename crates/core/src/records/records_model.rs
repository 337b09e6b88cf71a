//! Daily performance record domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One measured dimension of a portfolio on a single day.
///
/// Value fields are optional: upstream may have produced a record for a
/// day without being able to price everything. Missing numeric fields
/// exclude the slice from compounding only; the day still counts toward
/// document counts and cash flow totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricSlice {
    pub total_value: Option<Decimal>,
    pub total_investment: Option<Decimal>,
    /// Signed cash flow for the day; negative means money flowing in.
    #[serde(default)]
    pub total_cash_flow: Decimal,
    /// Day-over-day change in percent units, already adjusted upstream
    /// for deposits/withdrawals. `None` on missing-data days.
    pub adjusted_daily_change_percentage: Option<Decimal>,
}

/// The per-currency view of a daily record: portfolio-level metrics plus
/// the same shape per asset key. Asset keys are an open-ended set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySlice {
    #[serde(flatten)]
    pub metrics: MetricSlice,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub per_asset: HashMap<String, MetricSlice>,
}

/// One already-computed daily performance record for a scope.
///
/// Records are immutable, produced upstream once per trading day, and
/// strictly date-ordered within a series with no duplicate dates. A
/// currency missing from `currencies` on an individual record is an
/// intentional optional-field situation, not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub currencies: HashMap<String, CurrencySlice>,
}

impl DailyRecord {
    pub fn slice(&self, currency: &str) -> Option<&CurrencySlice> {
        self.currencies.get(currency)
    }
}

/// A dated, signed cash flow used for Modified-Dietz weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowEvent {
    pub date: NaiveDate,
    /// Signed amount; negative means money flowing in.
    pub amount: Decimal,
}
