//! Factor chaining across granularities - windows, units and the walk.

mod factor_chainer;
mod window_model;

pub use factor_chainer::*;
pub use window_model::*;

#[cfg(test)]
mod factor_chainer_tests;
