//! Work-in-progress capacity gate.

use crate::core::Stage;
use serde::{Deserialize, Serialize};

/// Result of checking a stage's capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipCheck {
    /// True if another record may enter the stage.
    pub valid: bool,
    /// Why not, when invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl WipCheck {
    /// Returns the blocker for this check, if it fails.
    #[must_use]
    pub fn blocker_message(&self) -> Option<String> {
        if self.valid {
            None
        } else {
            self.message.clone()
        }
    }
}

/// Checks `target` against a caller-supplied occupancy snapshot.
///
/// The limit is an exclusive ceiling: a stage already holding `wip_limit`
/// records accepts no more. A stage without a limit always accepts.
#[must_use]
pub fn validate_wip_limit(target: &Stage, current_occupancy: u32) -> WipCheck {
    match target.wip_limit {
        Some(limit) if current_occupancy >= limit => WipCheck {
            valid: false,
            message: Some(format!(
                "Stage '{}' has reached its WIP limit of {limit}",
                target.name
            )),
        },
        _ => WipCheck {
            valid: true,
            message: None,
        },
    }
}
