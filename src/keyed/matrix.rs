use std::cmp::Ordering;
use std::collections::HashMap;

use thiserror::Error;

use crate::keyed::entry::GroupedEntry;
use crate::types::identifiers::Slot;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("Slot {0} is not accessible in the current matrix")]
    StaleSlot(Slot),
    #[error("Entry '{0}' has never been assigned a slot")]
    Unslotted(String),
}

/// Grouped entries bucketed under an ordered list of unique group keys.
///
/// The matrix owns every entry. Entries whose group key is unknown are kept
/// in `unkeyed` with their indices untouched; every other entry sits in
/// exactly one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix<T> {
    group_keys: Vec<String>,
    buckets: Vec<Vec<GroupedEntry<T>>>,
    unkeyed: Vec<GroupedEntry<T>>,
}

impl<T> Default for Matrix<T> {
    fn default() -> Self {
        Self {
            group_keys: Vec::new(),
            buckets: Vec::new(),
            unkeyed: Vec::new(),
        }
    }
}

/// Bucket `entries` under `group_keys`.
///
/// The caller's key list is never reordered: sorting happens on a private
/// copy. Repeated keys collapse onto their first position. Entries land in
/// their bucket in iteration order and take the bucket length as item index.
pub fn build_matrix<T>(
    group_keys: &[String],
    entries: Vec<GroupedEntry<T>>,
    sort_groups: bool,
) -> Matrix<T> {
    if group_keys.is_empty() {
        tracing::debug!(
            target: "keyed_core::matrix",
            entries = entries.len(),
            "no group keys, returning empty matrix"
        );
        return Matrix::default();
    }

    let mut sorted = group_keys.to_vec();
    if sort_groups {
        sorted.sort();
    }

    let mut keys: Vec<String> = Vec::with_capacity(sorted.len());
    let mut positions: HashMap<String, usize> = HashMap::with_capacity(sorted.len());
    for key in sorted {
        if !positions.contains_key(&key) {
            positions.insert(key.clone(), keys.len());
            keys.push(key);
        }
    }

    let mut buckets: Vec<Vec<GroupedEntry<T>>> = (0..keys.len()).map(|_| Vec::new()).collect();
    let mut unkeyed = Vec::new();

    for mut entry in entries {
        match positions.get(entry.group_key.as_str()) {
            Some(&group) => {
                let item = buckets[group].len();
                entry.assign_slot(Slot::new(group, item));
                buckets[group].push(entry);
            }
            None => unkeyed.push(entry),
        }
    }

    tracing::debug!(
        target: "keyed_core::matrix",
        groups = keys.len(),
        unkeyed = unkeyed.len(),
        "built matrix"
    );

    Matrix {
        group_keys: keys,
        buckets,
        unkeyed,
    }
}

impl<T> Matrix<T> {
    /// See [`build_matrix`].
    pub fn build(group_keys: &[String], entries: Vec<GroupedEntry<T>>, sort_groups: bool) -> Self {
        build_matrix(group_keys, entries, sort_groups)
    }

    pub fn group_keys(&self) -> &[String] {
        &self.group_keys
    }

    pub fn buckets(&self) -> &[Vec<GroupedEntry<T>>] {
        &self.buckets
    }

    pub fn unkeyed(&self) -> &[GroupedEntry<T>] {
        &self.unkeyed
    }

    pub fn has_unkeyed(&self) -> bool {
        !self.unkeyed.is_empty()
    }

    /// Number of bucketed entries. Unkeyed entries are not counted.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn accessible_at(&self, group: usize, item: usize) -> bool {
        group < self.group_keys.len() && item < self.buckets[group].len()
    }

    /// Whether the entry's current slot addresses an entry of this matrix.
    pub fn is_accessible(&self, entry: &GroupedEntry<T>) -> bool {
        entry
            .slot()
            .is_some_and(|slot| self.accessible_at(slot.group, slot.item))
    }

    pub fn get(&self, slot: Slot) -> Option<&GroupedEntry<T>> {
        self.buckets.get(slot.group)?.get(slot.item)
    }

    pub fn get_group(&self, key: &str) -> Option<&[GroupedEntry<T>]> {
        let group = self.group_keys.iter().position(|k| k == key)?;
        Some(&self.buckets[group])
    }

    /// Bucketed entries, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &GroupedEntry<T>> {
        self.buckets.iter().flatten()
    }

    pub fn checked_values(&self) -> Vec<&T> {
        self.iter()
            .filter(|grouped| grouped.entry.checked)
            .map(|grouped| &grouped.entry.value)
            .collect()
    }

    pub fn set_visible(&mut self, entry: &GroupedEntry<T>, show: bool) -> Result<(), MatrixError> {
        let slot = slot_of(entry)?;
        self.set_visible_at(slot, show)
    }

    pub fn set_checked(&mut self, entry: &GroupedEntry<T>, check: bool) -> Result<(), MatrixError> {
        let slot = slot_of(entry)?;
        self.set_checked_at(slot, check)
    }

    pub fn set_visible_at(&mut self, slot: Slot, show: bool) -> Result<(), MatrixError> {
        self.slot_mut(slot)?.entry.visible = show;
        Ok(())
    }

    pub fn set_checked_at(&mut self, slot: Slot, check: bool) -> Result<(), MatrixError> {
        self.slot_mut(slot)?.entry.checked = check;
        Ok(())
    }

    /// Reorder every bucket and renumber item indices to the new order.
    ///
    /// Slots captured before the call keep pointing at positions, not at the
    /// entries that used to live there.
    pub fn sort_items_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&GroupedEntry<T>, &GroupedEntry<T>) -> Ordering,
    {
        for bucket in &mut self.buckets {
            bucket.sort_by(&mut compare);
        }
        self.refresh_item_indices();
    }

    fn refresh_item_indices(&mut self) {
        for (group, bucket) in self.buckets.iter_mut().enumerate() {
            for (item, entry) in bucket.iter_mut().enumerate() {
                entry.assign_slot(Slot::new(group, item));
            }
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> Result<&mut GroupedEntry<T>, MatrixError> {
        if !self.accessible_at(slot.group, slot.item) {
            tracing::warn!(target: "keyed_core::matrix", %slot, "rejected mutation of stale slot");
            return Err(MatrixError::StaleSlot(slot));
        }
        Ok(&mut self.buckets[slot.group][slot.item])
    }
}

fn slot_of<T>(entry: &GroupedEntry<T>) -> Result<Slot, MatrixError> {
    entry
        .slot()
        .ok_or_else(|| MatrixError::Unslotted(entry.entry.key.clone()))
}
