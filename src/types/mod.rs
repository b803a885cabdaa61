pub mod identifiers;
pub mod outcome;

pub use identifiers::{SecondaryId, Slot, TableVersion};
pub use outcome::{SelectionMode, SelectionOutcome};
