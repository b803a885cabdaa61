use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keyed::lookup::key_map;
use crate::transmittal::config::{Alignment, ColumnLayout, TableLayout, TransmittalConfig};
use crate::types::identifiers::{SecondaryId, TableVersion};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransmittalError {
    #[error("Primary '{key}' has {found} fixed fields, expected {expected}")]
    FixedFieldMismatch {
        key: String,
        expected: usize,
        found: usize,
    },
    #[error("Duplicate secondary id: {0}")]
    DuplicateSecondaryId(SecondaryId),
}

/// A row entity: a stable key, its identifying fields and the secondary it
/// currently sits at, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryDescriptor {
    pub key: String,
    pub fixed: Vec<String>,
    pub current: Option<SecondaryId>,
}

impl PrimaryDescriptor {
    pub fn new<F>(
        key: impl Into<String>,
        fixed: impl IntoIterator<Item = F>,
        current: Option<SecondaryId>,
    ) -> Self
    where
        F: Into<String>,
    {
        Self {
            key: key.into(),
            fixed: fixed.into_iter().map(Into::into).collect(),
            current,
        }
    }
}

/// A column entity. Ids must be unique within one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryDescriptor {
    pub id: SecondaryId,
    pub label: String,
}

impl SecondaryDescriptor {
    pub fn new(id: i64, label: impl Into<String>) -> Self {
        Self {
            id: SecondaryId::new(id),
            label: label.into(),
        }
    }
}

/// Cell text for a `(primary key, secondary id)` pair.
pub trait CellLookup {
    fn lookup(&self, primary_key: &str, secondary: SecondaryId) -> Option<String>;
}

impl<F> CellLookup for F
where
    F: Fn(&str, SecondaryId) -> Option<String>,
{
    fn lookup(&self, primary_key: &str, secondary: SecondaryId) -> Option<String> {
        self(primary_key, secondary)
    }
}

/// Rectangular grid of primaries against secondaries.
///
/// The header and every row have `fixed_column_count + secondaries` cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransmittalTable {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    fixed_column_count: usize,
}

impl TransmittalTable {
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn fixed_column_count(&self) -> usize {
        self.fixed_column_count
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn secondary_column_count(&self) -> usize {
        self.header.len() - self.fixed_column_count
    }

    /// Header followed by the rows.
    pub fn to_matrix(&self) -> Vec<Vec<String>> {
        std::iter::once(&self.header)
            .chain(&self.rows)
            .cloned()
            .collect()
    }

    pub fn version(&self) -> TableVersion {
        TableVersion::from_rows(std::iter::once(&self.header).chain(&self.rows))
    }

    /// Wide left-aligned fixed columns, then narrow centered secondary
    /// columns with rotated headers. The header row is tall enough for the
    /// rotated labels.
    pub fn column_layout(&self, config: &TransmittalConfig) -> TableLayout {
        let layout = &config.layout;
        let columns = (0..self.column_count())
            .map(|column| {
                if column < self.fixed_column_count {
                    ColumnLayout {
                        width: layout.fixed_width,
                        align: Alignment::Left,
                        header_rotation: 0,
                    }
                } else {
                    ColumnLayout {
                        width: layout.secondary_width,
                        align: Alignment::Center,
                        header_rotation: layout.header_rotation,
                    }
                }
            })
            .collect();

        TableLayout {
            header_height: layout.header_height,
            columns,
        }
    }
}

/// TransmittalBuilder is single-threaded and holds no state between builds.
pub struct TransmittalBuilder {
    config: TransmittalConfig,
}

impl Default for TransmittalBuilder {
    fn default() -> Self {
        Self::new(TransmittalConfig::v0())
    }
}

impl TransmittalBuilder {
    pub fn new(config: TransmittalConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TransmittalConfig {
        &self.config
    }

    /// Correlate `primaries` (rows) against `secondaries` (columns).
    ///
    /// Secondaries are used in the order given. A missing lookup renders as
    /// an empty cell. The "current" column shows the current secondary's
    /// label, or its lookup when it is not one of `secondaries`; the
    /// placeholder only when neither yields text.
    pub fn build<L>(
        &self,
        primaries: &[PrimaryDescriptor],
        secondaries: &[SecondaryDescriptor],
        lookup: L,
    ) -> Result<TransmittalTable, TransmittalError>
    where
        L: CellLookup,
    {
        let mut seen = BTreeSet::new();
        for secondary in secondaries {
            if !seen.insert(secondary.id) {
                return Err(TransmittalError::DuplicateSecondaryId(secondary.id));
            }
        }

        let expected = self.config.fixed_labels.len();
        if let Some(bad) = primaries.iter().find(|p| p.fixed.len() != expected) {
            return Err(TransmittalError::FixedFieldMismatch {
                key: bad.key.clone(),
                expected,
                found: bad.fixed.len(),
            });
        }

        // 1. Header
        let header: Vec<String> = self
            .config
            .fixed_labels
            .iter()
            .cloned()
            .chain(std::iter::once(self.config.current_label.clone()))
            .chain(secondaries.iter().map(|s| s.label.clone()))
            .collect();

        // 2. Rows
        let labels = key_map(
            secondaries,
            |s: &&SecondaryDescriptor| s.id,
            |s: &&SecondaryDescriptor| s.label.clone(),
        );
        let rows: Vec<Vec<String>> = primaries
            .iter()
            .map(|primary| {
                // A current secondary outside the chosen columns still shows
                // what the primary carries for it.
                let current = primary
                    .current
                    .and_then(|id| {
                        labels
                            .get(&id)
                            .cloned()
                            .or_else(|| lookup.lookup(&primary.key, id))
                    })
                    .unwrap_or_else(|| self.config.placeholder.clone());

                primary
                    .fixed
                    .iter()
                    .cloned()
                    .chain(std::iter::once(current))
                    .chain(
                        secondaries
                            .iter()
                            .map(|s| lookup.lookup(&primary.key, s.id).unwrap_or_default()),
                    )
                    .collect()
            })
            .collect();

        let fixed_column_count = self.config.fixed_column_count();
        debug_assert!(rows.iter().all(|row| row.len() == header.len()));
        debug_assert_eq!(header.len(), fixed_column_count + secondaries.len());

        tracing::debug!(
            target: "keyed_core::transmittal",
            rows = rows.len(),
            secondaries = secondaries.len(),
            "built transmittal table"
        );

        Ok(TransmittalTable {
            header,
            rows,
            fixed_column_count,
        })
    }
}
