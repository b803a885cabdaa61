use serde::{Deserialize, Serialize};

// Serializable, comparable, explicit defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransmittalConfig {
    /// Labels of the identifying columns, in order. The "current" column
    /// follows them.
    pub fixed_labels: Vec<String>,
    pub current_label: String,
    /// Shown in the "current" column when a primary has no current secondary,
    /// or one that resolves to no text.
    pub placeholder: String,
    pub layout: LayoutConfig,
}

impl TransmittalConfig {
    pub fn v0() -> Self {
        Self {
            fixed_labels: vec!["Number".into(), "Name".into()],
            current_label: "Current".into(),
            placeholder: "-".into(),
            layout: LayoutConfig::v0(),
        }
    }

    /// Identifying columns plus the "current" column.
    pub fn fixed_column_count(&self) -> usize {
        self.fixed_labels.len() + 1
    }
}

impl Default for TransmittalConfig {
    fn default() -> Self {
        Self::v0()
    }
}

/// Rendering contract handed to export sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub fixed_width: u16,
    pub secondary_width: u16,
    /// Degrees of rotation for secondary column headers.
    pub header_rotation: u16,
    pub header_height: u16,
}

impl LayoutConfig {
    pub fn v0() -> Self {
        Self {
            fixed_width: 30,
            secondary_width: 5,
            header_rotation: 90,
            header_height: 150,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub width: u16,
    pub align: Alignment,
    pub header_rotation: u16,
}

/// Layout of a whole table: the header row height and one entry per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    pub header_height: u16,
    pub columns: Vec<ColumnLayout>,
}
