pub mod matching;

use serde::Serialize;

use crate::keyed::entry::{build_entries, Entry};
use crate::types::outcome::{SelectionMode, SelectionOutcome};
pub use matching::{Matcher, SubstringMatcher};

/// A row as the list shows it: the entry key and the checkbox state the
/// user sees, which may be ahead of the entry until the next sync.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub key: String,
    pub checked: bool,
}

/// Filtering and picking over a fixed, origin-ordered list of entries.
///
/// The session owns its entries for its whole life. Nothing outside the
/// session observes a change until [`SelectionSession::commit`] hands back
/// the chosen values.
pub struct SelectionSession<T, M = SubstringMatcher> {
    entries: Vec<Entry<T>>,
    mode: SelectionMode,
    matcher: M,
    filter_text: String,
    visible_indices: Vec<usize>,
    rows: Vec<DisplayRow>,
    highlighted: Option<usize>,
}

impl<T> SelectionSession<T, SubstringMatcher> {
    pub fn new<K>(
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = T>,
        mode: SelectionMode,
    ) -> Self
    where
        K: Into<String>,
    {
        Self::with_matcher(keys, values, mode, SubstringMatcher)
    }
}

impl<T, M> SelectionSession<T, M>
where
    M: Matcher,
{
    pub fn with_matcher<K>(
        keys: impl IntoIterator<Item = K>,
        values: impl IntoIterator<Item = T>,
        mode: SelectionMode,
        matcher: M,
    ) -> Self
    where
        K: Into<String>,
    {
        let entries = build_entries(keys, values);
        let visible_indices: Vec<usize> = (0..entries.len()).collect();

        let mut session = Self {
            entries,
            mode,
            matcher,
            filter_text: String::new(),
            visible_indices,
            rows: Vec::new(),
            highlighted: None,
        };
        session.rebuild_rows();
        session
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn filter_text(&self) -> &str {
        &self.filter_text
    }

    pub fn visible_indices(&self) -> &[usize] {
        &self.visible_indices
    }

    pub fn rows(&self) -> &[DisplayRow] {
        &self.rows
    }

    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlighted
    }

    /// Keys of the displayed rows, in display order.
    pub fn visible_keys(&self) -> Vec<&str> {
        self.rows.iter().map(|row| row.key.as_str()).collect()
    }

    /// Toggle a displayed checkbox. Only the row changes; the entry picks the
    /// state up on the next sync. Returns `false` for an unknown row or in
    /// single mode, where rows have no checkbox.
    pub fn set_row_checked(&mut self, row: usize, checked: bool) -> bool {
        if self.mode == SelectionMode::Single {
            return false;
        }
        match self.rows.get_mut(row) {
            Some(display) => {
                display.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Highlight a displayed row, or clear the highlight with `None`.
    pub fn highlight_row(&mut self, row: Option<usize>) -> bool {
        match row {
            Some(r) if r >= self.rows.len() => false,
            _ => {
                self.highlighted = row;
                true
            }
        }
    }

    /// Copy the checkbox state of every displayed row back into its entry.
    pub fn sync_checked_from_rows(&mut self) {
        for (row, &index) in self.rows.iter().zip(&self.visible_indices) {
            self.entries[index].checked = row.checked;
        }
    }

    /// Re-filter the list for `text`.
    ///
    /// Displayed checkbox state is synced first so rows about to be hidden
    /// keep their toggles. Matching entries stay in origin order.
    pub fn on_filter_changed(&mut self, text: impl Into<String>) {
        self.sync_checked_from_rows();
        self.filter_text = text.into();

        let filter = self.filter_text.as_str();
        for entry in &mut self.entries {
            entry.visible = filter.is_empty() || self.matcher.matches(filter, &entry.key);
        }

        self.visible_indices = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.visible)
            .map(|(index, _)| index)
            .collect();

        self.rebuild_rows();
        self.highlighted = None;

        tracing::debug!(
            target: "keyed_core::selection",
            filter = %self.filter_text,
            visible = self.visible_indices.len(),
            total = self.entries.len(),
            "filter recomputed"
        );
    }

    /// Check every displayed entry. Hidden entries are left alone.
    pub fn check_all(&mut self) {
        self.set_all_visible(true);
    }

    /// Uncheck every displayed entry. Hidden entries are left alone.
    pub fn uncheck_all(&mut self) {
        self.set_all_visible(false);
    }

    /// Resolve the session.
    ///
    /// Multi mode returns every checked value in origin order, whether or not
    /// it is displayed; nothing checked means `Cancelled`. Single mode returns
    /// the value behind the highlighted row, or `Cancelled` without one.
    pub fn commit(mut self) -> SelectionOutcome<T> {
        self.sync_checked_from_rows();

        let outcome = match self.mode {
            SelectionMode::Multi => {
                let values: Vec<T> = self
                    .entries
                    .into_iter()
                    .filter(|entry| entry.checked)
                    .map(|entry| entry.value)
                    .collect();
                if values.is_empty() {
                    SelectionOutcome::Cancelled
                } else {
                    SelectionOutcome::Multiple(values)
                }
            }
            SelectionMode::Single => {
                let index = self
                    .highlighted
                    .and_then(|row| self.visible_indices.get(row).copied());
                match index.and_then(|i| self.entries.into_iter().nth(i)) {
                    Some(entry) => SelectionOutcome::Single(entry.value),
                    None => SelectionOutcome::Cancelled,
                }
            }
        };

        tracing::debug!(target: "keyed_core::selection", outcome = outcome.kind(), "session committed");
        outcome
    }

    pub fn cancel(self) -> SelectionOutcome<T> {
        tracing::debug!(target: "keyed_core::selection", "session cancelled");
        SelectionOutcome::Cancelled
    }

    fn set_all_visible(&mut self, checked: bool) {
        if self.mode == SelectionMode::Single {
            return;
        }
        for &index in &self.visible_indices {
            self.entries[index].checked = checked;
        }
        for row in &mut self.rows {
            row.checked = checked;
        }
    }

    fn rebuild_rows(&mut self) {
        self.rows = self
            .visible_indices
            .iter()
            .map(|&index| {
                let entry = &self.entries[index];
                DisplayRow {
                    key: entry.key.clone(),
                    checked: entry.checked,
                }
            })
            .collect();
    }
}
