//! Folioperf Core - Return consolidation engine.
//!
//! This crate contains the return-computation layer of the folioperf
//! backend: pure compounding/Dietz math, consolidation of daily records
//! into monthly/yearly checkpoints, multi-account aggregation, factor
//! chaining across granularities, and the query orchestrator that picks
//! between the consolidated path and the full-scan fallback.
//!
//! It is storage-agnostic: record and checkpoint persistence, caching
//! and request routing are defined as traits and implemented elsewhere.

pub mod aggregation;
pub mod chaining;
pub mod consolidation;
pub mod constants;
pub mod errors;
pub mod query;
pub mod records;
pub mod returns;
pub mod utils;

// Re-export common domain types
pub use chaining::*;
pub use consolidation::*;
pub use query::*;
pub use records::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
