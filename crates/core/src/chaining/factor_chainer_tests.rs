//! Unit tests for the factor chaining walk.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::chaining::{build_units, run, ReturnTarget, ReturnWindow};
use crate::consolidation::{consolidate_period, split_by_period, PeriodType};
use crate::records::{CurrencySlice, DailyRecord, MetricSlice};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn day(
    date: NaiveDate,
    value: Decimal,
    change_pct: Option<Decimal>,
    cash_flow: Decimal,
) -> DailyRecord {
    DailyRecord {
        date,
        currencies: HashMap::from([(
            "EUR".to_string(),
            CurrencySlice {
                metrics: MetricSlice {
                    total_value: Some(value),
                    total_investment: Some(value),
                    total_cash_flow: cash_flow,
                    adjusted_daily_change_percentage: change_pct,
                },
                per_asset: HashMap::new(),
            },
        )]),
    }
}

fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} within {} of {}",
        actual,
        tolerance,
        expected
    );
}

#[test]
fn test_yearly_checkpoint_only_one_year_window() {
    // A single 2025 yearly checkpoint: factor 1 -> 1.10, values
    // 1000 -> 1250, cash flow -150, and no finer daily data.
    let checkpoint = crate::consolidation::PeriodCheckpoint {
        id: "acct-1_year_2025".to_string(),
        scope_id: "acct-1".to_string(),
        period_type: PeriodType::Year,
        period_key: "2025".to_string(),
        start_date: date(2025, 1, 2),
        end_date: date(2025, 12, 31),
        docs_count: 250,
        per_currency: HashMap::from([(
            "EUR".to_string(),
            crate::consolidation::CurrencySummary {
                summary: crate::consolidation::AssetSummary {
                    start_factor: Decimal::ONE,
                    end_factor: dec!(1.10),
                    period_return_pct: dec!(10),
                    start_total_value: dec!(1000),
                    end_total_value: dec!(1250),
                    total_cash_flow: dec!(-150),
                    personal_return_pct: dec!(9.302325),
                    valid_docs_count: 250,
                },
                per_asset: HashMap::new(),
            },
        )]),
        calculated_at: chrono::Utc::now(),
    };

    let units = build_units(&[checkpoint], &[], &[], "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 12, 31));

    let one_year = &outcome.windows[&ReturnWindow::OneYear];
    assert!(one_year.found);
    assert_eq!(one_year.return_pct(), dec!(10.00));
    // (1250 - 1000 - 150) / (1000 + 75) * 100
    assert_close(one_year.personal_return_pct(), dec!(9.302325), dec!(0.000001));
    assert_eq!(one_year.total_cash_flow, dec!(-150));
    assert_eq!(one_year.docs_count, 250);
}

#[test]
fn test_window_start_factor_not_reset() {
    // Two monthly checkpoints; the 1M window enters at the second one,
    // so its start factor is the chain factor accumulated by the first.
    let july: Vec<DailyRecord> = vec![
        day(date(2025, 7, 1), dec!(1000), Some(dec!(10)), Decimal::ZERO),
        day(date(2025, 7, 31), dec!(1100), Some(dec!(0)), Decimal::ZERO),
    ];
    let august = vec![
        day(date(2025, 8, 1), dec!(1100), Some(dec!(0)), Decimal::ZERO),
        day(date(2025, 8, 31), dec!(1210), Some(dec!(10)), Decimal::ZERO),
    ];
    let checkpoints = vec![
        consolidate_period("a", PeriodType::Month, "2025-07", &july).unwrap(),
        consolidate_period("a", PeriodType::Month, "2025-08", &august).unwrap(),
    ];

    let units = build_units(&[], &checkpoints, &[], "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 9, 1));

    let one_month = &outcome.windows[&ReturnWindow::OneMonth];
    assert!(one_month.found);
    assert_eq!(one_month.start_factor, dec!(1.10));
    assert_eq!(one_month.current_factor, dec!(1.10) * dec!(1.10));
    assert_eq!(one_month.return_pct(), dec!(10.00));

    // The 3M window spans both checkpoints.
    let three_months = &outcome.windows[&ReturnWindow::ThreeMonths];
    assert!(three_months.found);
    assert_eq!(three_months.start_factor, Decimal::ONE);
    assert_close(three_months.return_pct(), dec!(21), dec!(0.000001));
}

#[test]
fn test_insufficient_history_not_found() {
    // With no units at all, every window stays unresolved; callers
    // must report "insufficient history" rather than 0%.
    let outcome = run(&[], date(2025, 8, 31));
    for window in ReturnWindow::ALL {
        assert!(!outcome.windows[&window].found, "{:?}", window);
    }
}

#[test]
fn test_missing_boundary_day_resolves_from_next_unit() {
    // Boundary for 1M from 2025-08-20 is 2025-07-20; that day is absent.
    // The window must still resolve from the next available day.
    let daily = vec![
        day(date(2025, 7, 18), dec!(1000), Some(dec!(1)), Decimal::ZERO),
        day(date(2025, 7, 22), dec!(1010), Some(dec!(1)), Decimal::ZERO),
        day(date(2025, 8, 20), dec!(1020), Some(dec!(1)), Decimal::ZERO),
    ];
    let units = build_units(&[], &[], &daily, "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 8, 20));

    let one_month = &outcome.windows[&ReturnWindow::OneMonth];
    assert!(one_month.found);
    assert_eq!(one_month.start_value, Some(dec!(1010)));
    assert_eq!(one_month.docs_count, 2);
}

#[test]
fn test_day_without_value_counts_but_does_not_compound() {
    let daily = vec![
        day(date(2025, 8, 1), dec!(1000), Some(dec!(1)), Decimal::ZERO),
        DailyRecord {
            date: date(2025, 8, 4),
            currencies: HashMap::from([(
                "EUR".to_string(),
                CurrencySlice {
                    metrics: MetricSlice {
                        total_value: None,
                        total_investment: None,
                        total_cash_flow: dec!(-500),
                        adjusted_daily_change_percentage: None,
                    },
                    per_asset: HashMap::new(),
                },
            )]),
        },
        day(date(2025, 8, 5), dec!(1510), Some(dec!(1)), Decimal::ZERO),
    ];
    let units = build_units(&[], &[], &daily, "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 8, 5));

    let ytd = &outcome.windows[&ReturnWindow::YearToDate];
    assert_eq!(ytd.current_factor, dec!(1.01) * dec!(1.01));
    assert_eq!(ytd.total_cash_flow, dec!(-500));
    assert_eq!(ytd.docs_count, 3);
    assert_eq!(ytd.valid_docs_count, 2);
    assert_eq!(ytd.end_value, Some(dec!(1510)));
}

#[test]
fn test_asset_target_follows_per_asset_slices() {
    let asset = |value: Decimal, pct: Decimal| MetricSlice {
        total_value: Some(value),
        total_investment: None,
        total_cash_flow: Decimal::ZERO,
        adjusted_daily_change_percentage: Some(pct),
    };
    let mut first = day(date(2025, 8, 1), dec!(1000), Some(dec!(0)), Decimal::ZERO);
    first
        .currencies
        .get_mut("EUR")
        .unwrap()
        .per_asset
        .insert("ETF_A".to_string(), asset(dec!(400), dec!(2)));
    // ETF_A is missing on the second day; the chain skips it silently.
    let second = day(date(2025, 8, 4), dec!(1010), Some(dec!(1)), Decimal::ZERO);
    let mut third = day(date(2025, 8, 5), dec!(1020), Some(dec!(1)), Decimal::ZERO);
    third
        .currencies
        .get_mut("EUR")
        .unwrap()
        .per_asset
        .insert("ETF_A".to_string(), asset(dec!(412), dec!(3)));

    let daily = vec![first, second, third];
    let units = build_units(
        &[],
        &[],
        &daily,
        "EUR",
        &ReturnTarget::Asset("ETF_A".to_string()),
    );
    assert_eq!(units.len(), 2);

    let outcome = run(&units, date(2025, 8, 5));
    let ytd = &outcome.windows[&ReturnWindow::YearToDate];
    assert_eq!(ytd.current_factor, dec!(1.02) * dec!(1.03));
    assert_eq!(ytd.end_value, Some(dec!(412)));
}

#[test]
fn test_performance_by_year_rollup() {
    // One closed month as a checkpoint plus current-month dailies.
    let july = vec![
        day(date(2025, 7, 1), dec!(1000), Some(dec!(2)), dec!(-50)),
        day(date(2025, 7, 31), dec!(1040), Some(dec!(2)), Decimal::ZERO),
    ];
    let checkpoint = consolidate_period("a", PeriodType::Month, "2025-07", &july).unwrap();
    let daily = vec![
        day(date(2025, 8, 1), dec!(1050), Some(dec!(1)), Decimal::ZERO),
        day(date(2025, 8, 4), dec!(1060), Some(dec!(1)), dec!(-25)),
    ];

    let units = build_units(&[], &[checkpoint], &daily, "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 8, 4));

    let year = &outcome.performance_by_year[&2025];
    assert_close(year.months[&7], dec!(4.04), dec!(0.000001));
    assert_close(year.months[&8], dec!(2.01), dec!(0.000001));
    // Annual total compounds the monthly factors.
    let expected_total = (dec!(1.0404) * dec!(1.0201) - Decimal::ONE) * dec!(100);
    assert_close(year.total, expected_total, dec!(0.000001));
    assert_eq!(outcome.available_years(), vec![2025]);

    // Year-level personal return uses the year's own start/end values
    // and the summed cash flow.
    assert_eq!(year.personal_total, {
        crate::returns::simple_personal_return(dec!(1000), dec!(1060), dec!(-75))
    });
}

#[test]
fn test_checkpoint_only_year_has_no_monthly_breakdown() {
    let seed = vec![
        day(date(2022, 1, 3), dec!(500), Some(dec!(5)), Decimal::ZERO),
        day(date(2022, 12, 30), dec!(525), Some(dec!(0)), Decimal::ZERO),
    ];
    let checkpoint = consolidate_period("a", PeriodType::Year, "2022", &seed).unwrap();
    let units = build_units(&[checkpoint], &[], &[], "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 8, 4));

    let year = &outcome.performance_by_year[&2022];
    assert!(year.months.is_empty());
    assert_eq!(year.total, dec!(5.00));
}

#[test]
fn test_total_value_data_series() {
    let daily = vec![
        day(date(2025, 8, 1), dec!(1000), Some(dec!(1)), Decimal::ZERO),
        day(date(2025, 8, 4), dec!(1010), Some(dec!(1)), Decimal::ZERO),
    ];
    let units = build_units(&[], &[], &daily, "EUR", &ReturnTarget::Portfolio);
    let outcome = run(&units, date(2025, 8, 4));

    let series = &outcome.total_value_data;
    assert_eq!(series.dates, vec![date(2025, 8, 1), date(2025, 8, 4)]);
    assert_eq!(series.values, vec![dec!(1000), dec!(1010)]);
    assert_eq!(series.percent_changes, vec![dec!(1.00), dec!(1.00)]);
    assert_close(
        series.overall_percent_change,
        dec!(2.01),
        dec!(0.000001),
    );
    assert_eq!(outcome.start_date, Some(date(2025, 8, 1)));
}

#[test]
fn test_chaining_equivalence_against_brute_force() {
    // Eight months of synthetic history ending on a month boundary, so
    // every window boundary lands on a closed-period start. The
    // consolidated walk and the brute-force daily walk must agree.
    let mut records = Vec::new();
    let mut value = dec!(10000);
    for month in 1..=8u32 {
        for day_of_month in [1u32, 8, 15, 22] {
            let pct = Decimal::from((month + day_of_month) % 5) - dec!(2); // -2..=2
            value = value * (Decimal::ONE + pct / dec!(100));
            let flow = if day_of_month == 15 { dec!(-100) } else { Decimal::ZERO };
            records.push(day(date(2025, month, day_of_month), value, Some(pct), flow));
        }
    }
    let today = date(2025, 9, 1);
    records.push(day(today, value, Some(dec!(0)), Decimal::ZERO));

    // Brute force: one pass over the full unconsolidated series.
    let brute_units = build_units(&[], &[], &records, "EUR", &ReturnTarget::Portfolio);
    let brute = run(&brute_units, today);

    // Consolidated: closed months become checkpoints, the current month
    // stays daily.
    let (closed, current): (Vec<_>, Vec<_>) =
        records.iter().cloned().partition(|r| r.date < date(2025, 9, 1));
    let monthly: Vec<_> = split_by_period(&closed, PeriodType::Month)
        .into_iter()
        .filter_map(|(key, group)| consolidate_period("a", PeriodType::Month, &key, &group))
        .collect();
    let consolidated_units =
        build_units(&[], &monthly, &current, "EUR", &ReturnTarget::Portfolio);
    let consolidated = run(&consolidated_units, today);

    let tolerance = dec!(0.000001);
    for window in ReturnWindow::ALL {
        let brute_window = &brute.windows[&window];
        let consolidated_window = &consolidated.windows[&window];
        assert_eq!(brute_window.found, consolidated_window.found, "{:?}", window);
        if brute_window.found {
            assert_close(
                consolidated_window.return_pct(),
                brute_window.return_pct(),
                tolerance,
            );
            assert_close(
                consolidated_window.personal_return_pct(),
                brute_window.personal_return_pct(),
                tolerance,
            );
            assert_eq!(
                brute_window.total_cash_flow,
                consolidated_window.total_cash_flow,
                "{:?}",
                window
            );
        }
    }
}
