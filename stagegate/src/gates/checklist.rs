//! Checklist completion gate.

use crate::core::{ChecklistItem, CompletionMap};
use serde::{Deserialize, Serialize};

/// Result of checking a stage checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistCheck {
    /// True iff every required item is complete.
    pub can_advance: bool,
    /// Required items that are missing or incomplete, in the given order.
    pub missing_required: Vec<ChecklistItem>,
}

impl ChecklistCheck {
    /// Returns the single-line blocker for this check, if it fails.
    #[must_use]
    pub fn blocker_message(&self) -> Option<String> {
        if self.can_advance {
            return None;
        }
        let titles: Vec<&str> = self
            .missing_required
            .iter()
            .map(|item| item.title.as_str())
            .collect();
        Some(format!(
            "{}: {}",
            pending_summary(self.missing_required.len()),
            titles.join(", ")
        ))
    }
}

fn pending_summary(count: usize) -> String {
    format!("{count} required item(s) pending")
}

fn missing_required<'a>(
    items: &'a [ChecklistItem],
    completion: &'a CompletionMap,
) -> impl Iterator<Item = &'a ChecklistItem> {
    items
        .iter()
        .filter(move |item| item.required && !completion.is_complete(&item.id))
}

/// Checks whether every required item is complete.
#[must_use]
pub fn can_advance(items: &[ChecklistItem], completion: &CompletionMap) -> ChecklistCheck {
    let missing: Vec<ChecklistItem> = missing_required(items, completion).cloned().collect();
    ChecklistCheck {
        can_advance: missing.is_empty(),
        missing_required: missing,
    }
}

/// Returns the share of completed items, rounded to the nearest percent.
///
/// An empty checklist is 100% complete.
#[must_use]
pub fn completion_percentage(items: &[ChecklistItem], completion: &CompletionMap) -> u8 {
    let total = items.len();
    if total == 0 {
        return 100;
    }
    let done = items
        .iter()
        .filter(|item| completion.is_complete(&item.id))
        .count();
    // Round half up in integer arithmetic.
    let percent = (200 * done + total) / (2 * total);
    u8::try_from(percent).unwrap_or(100)
}

/// Returns the number of required items that are not complete.
#[must_use]
pub fn missing_required_count(items: &[ChecklistItem], completion: &CompletionMap) -> usize {
    missing_required(items, completion).count()
}

/// Renders the checklist gate as an ordered error list.
///
/// Empty when the stage may be advanced. Otherwise a summary line followed
/// by one line per missing item title.
#[must_use]
pub fn validate_stage_advancement(
    items: &[ChecklistItem],
    completion: &CompletionMap,
) -> Vec<String> {
    let check = can_advance(items, completion);
    if check.can_advance {
        return Vec::new();
    }

    let mut errors = Vec::with_capacity(check.missing_required.len() + 1);
    errors.push(pending_summary(check.missing_required.len()));
    errors.extend(check.missing_required.into_iter().map(|item| item.title));
    errors
}
