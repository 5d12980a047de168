pub mod compound;
pub mod set;

pub use compound::{Compound, DegradationTable};
pub use set::{TireSet, TireSetRecord, FULL_CONDITION};
