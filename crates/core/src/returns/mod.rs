//! Pure return math - compounding, personal return, Modified Dietz.

mod return_calculator;

pub use return_calculator::*;
