//! Value types for unit conversion

mod precision;
mod unit;
mod unit_type;

pub use precision::{combine_with_superunit, Precision, PrecisionNumber, EXACT_SIG_FIGS};
pub use unit::Unit;
pub use unit_type::{Multiple, UnitType};
