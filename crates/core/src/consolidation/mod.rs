//! Period consolidation - checkpoint models and the folding engine.

mod checkpoint_model;
mod checkpoint_traits;
mod consolidation_engine;

pub use checkpoint_model::*;
pub use checkpoint_traits::*;
pub use consolidation_engine::*;
