/// Scope ID of the synthetic all-accounts overall view
pub const OVERALL_SCOPE_ID: &str = "OVERALL";

/// Decimal precision for returned percentages
pub const DECIMAL_PRECISION: u32 = 6;

/// Number of trailing calendar years (before the current one) kept at
/// monthly checkpoint granularity; older years use yearly checkpoints.
pub const MONTHLY_CONSOLIDATION_YEARS: i32 = 2;

/// Response tag for the consolidated (checkpoint-backed) query path
pub const CONSOLIDATED_VERSION: &str = "v2";

/// Response tag for the full-scan fallback path
pub const FALLBACK_VERSION: &str = "v1-fallback";

/// Response tag for the multi-account aggregate path
pub const AGGREGATE_VERSION: &str = "v1-aggregate";
