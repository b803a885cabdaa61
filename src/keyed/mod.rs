pub mod entry;
pub mod lookup;
pub mod matrix;

pub use crate::types::identifiers::Slot;
pub use entry::{build_entries, Entry, GroupedEntry};
pub use lookup::{find_value_at_key, key_map};
pub use matrix::{build_matrix, Matrix, MatrixError};
