//! Command implementations

mod decide;
mod records;
mod serve;

pub use decide::{Decision, decide};
pub use records::{results, show};
pub use serve::serve;
