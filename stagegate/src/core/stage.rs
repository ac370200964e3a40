//! Pipeline stage definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One ordered step in a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stage {
    /// Stage identity.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Rank within the pipeline. Lower values come first.
    pub order: i32,
    /// Maximum number of records allowed in the stage. `None` means unlimited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip_limit: Option<u32>,
    /// Whether entering the stage requires a bound appointment.
    #[serde(default)]
    pub requires_appointment: bool,
}

impl Stage {
    /// Creates a new stage with no capacity limit and no appointment requirement.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, order: i32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            order,
            wip_limit: None,
            requires_appointment: false,
        }
    }

    /// Sets the WIP limit.
    #[must_use]
    pub fn with_wip_limit(mut self, limit: u32) -> Self {
        self.wip_limit = Some(limit);
        self
    }

    /// Marks the stage as requiring an appointment.
    #[must_use]
    pub fn with_appointment_required(mut self) -> Self {
        self.requires_appointment = true;
        self
    }

    /// Returns true if this stage comes before `other` in the pipeline.
    #[must_use]
    pub fn is_before(&self, other: &Self) -> bool {
        self.order < other.order
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_defaults() {
        let stage = Stage::new("lead", "Lead", 1);
        assert_eq!(stage.wip_limit, None);
        assert!(!stage.requires_appointment);
        assert_eq!(stage.to_string(), "Lead");
    }

    #[test]
    fn test_stage_ordering() {
        let lead = Stage::new("lead", "Lead", 1);
        let proposal = Stage::new("proposal", "Proposal", 3);
        assert!(lead.is_before(&proposal));
        assert!(!proposal.is_before(&lead));
        assert!(!lead.is_before(&lead));
    }

    #[test]
    fn test_stage_deserialize_optional_fields() {
        let stage: Stage =
            serde_json::from_str(r#"{"id":"demo","name":"Demo","order":2}"#).unwrap();
        assert_eq!(stage.wip_limit, None);
        assert!(!stage.requires_appointment);

        let json = serde_json::to_string(&stage).unwrap();
        assert!(!json.contains("wip_limit"));
    }
}
