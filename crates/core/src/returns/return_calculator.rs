//! Pure compounding and money-weighted return math. No I/O.
//!
//! All percentages are plain numbers in percent units (12.34 = +12.34%).
//! The blanket degeneracy policy applies throughout: zero or negative
//! denominators produce `Decimal::ZERO`, never NaN or infinity.

use chrono::NaiveDate;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::records::CashFlowEvent;

const HUNDRED: Decimal = dec!(100);
const TWO: Decimal = dec!(2);
const DAYS_PER_YEAR: Decimal = dec!(365.25);

/// Multiplies `factor` by the growth implied by a daily change
/// percentage. A missing percentage leaves the factor unchanged, so
/// missing-data days never corrupt the chain (they still count toward
/// document counts and cash flow totals elsewhere).
pub fn compound(factor: Decimal, change_pct: Option<Decimal>) -> Decimal {
    match change_pct {
        Some(pct) => factor * (Decimal::ONE + pct / HUNDRED),
        None => factor,
    }
}

/// Percentage implied by two multiplicative growth factors.
pub fn percent_from_factors(start_factor: Decimal, end_factor: Decimal) -> Decimal {
    if start_factor.is_zero() {
        return Decimal::ZERO;
    }
    (end_factor / start_factor - Decimal::ONE) * HUNDRED
}

/// Midpoint-simplified personal (money-weighted) return.
///
/// `total_cash_flow` is signed with negative meaning money flowing in,
/// so `net_deposits = -total_cash_flow`. Deposits are assumed to sit in
/// the portfolio for half the period on average, hence the
/// `start + deposits/2` investment base.
pub fn simple_personal_return(
    start_value: Decimal,
    end_value: Decimal,
    total_cash_flow: Decimal,
) -> Decimal {
    let net_deposits = -total_cash_flow;

    // Started from nothing: everything the portfolio is worth beyond the
    // deposits is gain on those deposits.
    if start_value <= Decimal::ZERO && net_deposits > Decimal::ZERO {
        return (end_value - net_deposits) / net_deposits * HUNDRED;
    }

    let midpoint_base = start_value + net_deposits / TWO;
    let investment_base = if midpoint_base > Decimal::ZERO {
        midpoint_base
    } else {
        start_value
    };
    if investment_base <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let gain = end_value - start_value - net_deposits;
    gain / investment_base * HUNDRED
}

/// Modified-Dietz money-weighted return with exact day weighting.
///
/// When the result blows past +/-100% the midpoint-simplified figure is
/// computed as well and whichever has the smaller magnitude wins. This
/// guard is a pragmatic heuristic, not mathematically rigorous; callers
/// that want to surface both candidates should use
/// [`modified_dietz_with_alternate`].
pub fn modified_dietz_return(
    start_value: Decimal,
    end_value: Decimal,
    cash_flows: &[CashFlowEvent],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Decimal {
    let (dietz, simple) =
        modified_dietz_with_alternate(start_value, end_value, cash_flows, start_date, end_date);
    if dietz.abs() > HUNDRED && simple.abs() < dietz.abs() {
        simple
    } else {
        dietz
    }
}

/// Returns `(modified_dietz, midpoint_simplified)` for the same period,
/// letting callers surface both instead of silently choosing one.
///
/// A zero-length period degrades both figures to the midpoint form.
pub fn modified_dietz_with_alternate(
    start_value: Decimal,
    end_value: Decimal,
    cash_flows: &[CashFlowEvent],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> (Decimal, Decimal) {
    let net_flow: Decimal = cash_flows.iter().map(|flow| flow.amount).sum();
    let simple = simple_personal_return(start_value, end_value, net_flow);

    let total_days = (end_date - start_date).num_days();
    if total_days <= 0 {
        return (simple, simple);
    }
    let total_days_dec = Decimal::from(total_days);

    // weight_i = fraction of the period remaining after the flow occurs
    let mut weighted_inflow = Decimal::ZERO;
    for flow in cash_flows {
        let days_to_end = (end_date - flow.date).num_days().clamp(0, total_days);
        let weight = Decimal::from(days_to_end) / total_days_dec;
        weighted_inflow += -flow.amount * weight;
    }

    let denominator = start_value + weighted_inflow;
    if denominator <= Decimal::ZERO {
        return (Decimal::ZERO, simple);
    }

    let numerator = end_value - start_value - net_flow;
    (numerator / denominator * HUNDRED, simple)
}

/// Annualizes a total return over `[start_date, end_date]` in percent
/// units: `(1 + r)^(1/years) - 1`. Periods under one year return the
/// total unchanged; total losses are capped at -100%.
pub fn annualized_return(
    start_date: NaiveDate,
    end_date: NaiveDate,
    total_return_pct: Decimal,
) -> Decimal {
    if start_date > end_date {
        return Decimal::ZERO;
    }
    if total_return_pct <= -HUNDRED {
        return -HUNDRED;
    }

    let days = (end_date - start_date).num_days();
    if days <= 0 {
        return total_return_pct;
    }

    let years = Decimal::from(days) / DAYS_PER_YEAR;
    if years < Decimal::ONE {
        return total_return_pct;
    }

    let base = Decimal::ONE + total_return_pct / HUNDRED;
    // Covered by the -100% cap above, kept against precision drift.
    if base <= Decimal::ZERO {
        return -HUNDRED;
    }

    (base.powd(Decimal::ONE / years) - Decimal::ONE) * HUNDRED
}
