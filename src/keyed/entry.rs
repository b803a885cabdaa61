use crate::types::identifiers::Slot;

/// A value paired with a display key and its position in the origin sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry<T> {
    pub value: T,
    pub key: String,
    index: Option<usize>,
    pub checked: bool,
    pub visible: bool,
}

impl<T> Entry<T> {
    /// An entry with no origin position.
    pub fn new(value: T, key: impl Into<String>) -> Self {
        Self {
            value,
            key: key.into(),
            index: None,
            checked: false,
            visible: true,
        }
    }

    pub fn with_index(value: T, key: impl Into<String>, index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::new(value, key)
        }
    }

    /// Position in the origin sequence, fixed at construction.
    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

/// Pair keys and values positionally.
///
/// Pairing stops at the shorter of the two inputs, so an empty input on
/// either side yields no entries. Each entry's index is its position.
pub fn build_entries<K, T>(
    keys: impl IntoIterator<Item = K>,
    values: impl IntoIterator<Item = T>,
) -> Vec<Entry<T>>
where
    K: Into<String>,
{
    keys.into_iter()
        .zip(values)
        .enumerate()
        .map(|(index, (key, value))| Entry::with_index(value, key, index))
        .collect()
}

/// An entry tagged with a group, used for two-axis correlation.
///
/// The embedded entry's index is the item index, and unlike a plain entry
/// it is reassigned together with `group_index` whenever the entry is
/// bucketed by [`crate::keyed::build_matrix`]. Neither `entry.key` nor
/// `group_key` is guaranteed unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedEntry<T> {
    pub entry: Entry<T>,
    pub group_value: T,
    pub group_key: String,
    group_index: Option<usize>,
}

impl<T> GroupedEntry<T> {
    pub fn new(
        value: T,
        key: impl Into<String>,
        group_value: T,
        group_key: impl Into<String>,
    ) -> Self {
        Self {
            entry: Entry::new(value, key),
            group_value,
            group_key: group_key.into(),
            group_index: None,
        }
    }

    /// A grouped entry that already carries a slot, e.g. from an earlier build.
    pub fn with_slot(
        value: T,
        key: impl Into<String>,
        group_value: T,
        group_key: impl Into<String>,
        slot: Slot,
    ) -> Self {
        let mut grouped = Self::new(value, key, group_value, group_key);
        grouped.assign_slot(slot);
        grouped
    }

    pub fn item_index(&self) -> Option<usize> {
        self.entry.index
    }

    pub fn group_index(&self) -> Option<usize> {
        self.group_index
    }

    /// The `(group, item)` pair, if both indices are set.
    pub fn slot(&self) -> Option<Slot> {
        match (self.group_index, self.entry.index) {
            (Some(group), Some(item)) => Some(Slot::new(group, item)),
            _ => None,
        }
    }

    /// `"group\titem"`, or `None` for an entry that was never slotted.
    pub fn index_key(&self) -> Option<String> {
        self.slot().map(|slot| slot.index_key())
    }

    pub(crate) fn assign_slot(&mut self, slot: Slot) {
        self.group_index = Some(slot.group);
        self.entry.index = Some(slot.item);
    }
}
