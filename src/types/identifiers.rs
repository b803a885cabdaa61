use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Composite position of a grouped entry inside a matrix: `(group, item)`.
///
/// Only valid for the matrix build that assigned it. Every access through a
/// slot is bounds-checked against the current matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub group: usize,
    pub item: usize,
}

impl Slot {
    pub fn new(group: usize, item: usize) -> Self {
        Self { group, item }
    }

    /// Tab separated `"group\titem"` identity string.
    pub fn index_key(&self) -> String {
        format!("{}\t{}", self.group, self.item)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.group, self.item)
    }
}

/// Identifier of a secondary (column) entity in a transmittal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SecondaryId(i64);

impl SecondaryId {
    pub fn new(raw: i64) -> Self {
        SecondaryId(raw)
    }

    pub fn get(&self) -> i64 {
        self.0
    }
}

impl From<i64> for SecondaryId {
    fn from(raw: i64) -> Self {
        SecondaryId(raw)
    }
}

impl fmt::Display for SecondaryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content hash version of a rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableVersion(String);

impl TableVersion {
    /// Hash a grid row by row. Cells are terminated by `\x1f` and rows by
    /// `\x1e` so that moving text between cells changes the version.
    pub fn from_rows<'a, R>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = &'a String>,
    {
        let mut hasher = Sha256::new();
        for row in rows {
            for cell in row {
                hasher.update(cell.as_bytes());
                hasher.update([0x1f_u8]);
            }
            hasher.update([0x1e_u8]);
        }

        let hash = hasher.finalize();
        let hex = hex::encode(hash);

        TableVersion(format!("sha256:{hex}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
