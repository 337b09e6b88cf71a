//! Multi-account aggregation into one synthetic daily series.

mod multi_account_aggregator;

pub use multi_account_aggregator::*;
