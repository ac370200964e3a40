//! Checklist items and completion state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named precondition attached to a stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Item identity.
    pub id: String,
    /// Owning stage.
    pub stage_id: String,
    /// Display title.
    pub title: String,
    /// Whether the item must be complete before the record may advance.
    #[serde(default)]
    pub required: bool,
    /// Display order.
    #[serde(default)]
    pub order: i32,
}

impl ChecklistItem {
    /// Creates a new checklist item.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        stage_id: impl Into<String>,
        title: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            id: id.into(),
            stage_id: stage_id.into(),
            title: title.into(),
            required,
            order: 0,
        }
    }

    /// Sets the display order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }
}

/// Completion state of checklist items, keyed by item id.
///
/// A missing key means the item is incomplete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionMap(BTreeMap<String, bool>);

impl CompletionMap {
    /// Creates an empty completion map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the completion state of an item.
    pub fn set(&mut self, item_id: impl Into<String>, completed: bool) {
        self.0.insert(item_id.into(), completed);
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, item_id: impl Into<String>, completed: bool) -> Self {
        self.set(item_id, completed);
        self
    }

    /// Returns true only if the item is explicitly marked complete.
    #[must_use]
    pub fn is_complete(&self, item_id: &str) -> bool {
        matches!(self.0.get(item_id), Some(true))
    }

    /// Returns the recorded state, or `None` if the item was never recorded.
    #[must_use]
    pub fn get(&self, item_id: &str) -> Option<bool> {
        self.0.get(item_id).copied()
    }

    /// Returns the number of recorded entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, bool)> for CompletionMap {
    fn from_iter<I: IntoIterator<Item = (K, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
