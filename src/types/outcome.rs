use serde::{Deserialize, Serialize};

/// How a selection session turns its state into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// One highlighted row is returned.
    Single,
    /// Every checked entry is returned, in origin order.
    #[default]
    Multi,
}

/// The result of a selection session.
///
/// A multi-select commit with nothing checked is `Cancelled`, not an empty
/// `Multiple`. Callers only ever have one cancellation branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionOutcome<T> {
    Cancelled,
    Single(T),
    Multiple(Vec<T>),
}

impl<T> SelectionOutcome<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, SelectionOutcome::Cancelled)
    }

    /// Flatten into a list; `Cancelled` yields `None`.
    pub fn into_values(self) -> Option<Vec<T>> {
        match self {
            SelectionOutcome::Cancelled => None,
            SelectionOutcome::Single(value) => Some(vec![value]),
            SelectionOutcome::Multiple(values) => Some(values),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SelectionOutcome::Cancelled => "cancelled",
            SelectionOutcome::Single(_) => "single",
            SelectionOutcome::Multiple(_) => "multiple",
        }
    }
}
