//! Daily performance records - domain models and storage seams.

mod records_model;
mod records_traits;

pub use records_model::*;
pub use records_traits::*;
