//! Returns query - wire models, cache seam and the orchestrator.

mod query_model;
mod query_orchestrator;
mod query_traits;

pub use query_model::*;
pub use query_orchestrator::*;
pub use query_traits::*;
