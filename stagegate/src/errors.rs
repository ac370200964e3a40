//! Error types for stagegate.
//!
//! A blocked transition is not an error: gates report it through their
//! check results and the movement verdict. The types here cover the two
//! outcome classes that are not business-rule blocks:
//!
//! - configuration faults in rule definitions ([`RuleConfigError`])
//! - operational failures of external collaborators ([`DataSourceError`])

use std::fmt;
use thiserror::Error;

/// The main error type for stagegate operations.
#[derive(Debug, Error)]
pub enum StagegateError {
    /// A rule configuration is malformed.
    #[error("{0}")]
    RuleConfig(#[from] RuleConfigError),

    /// An external data source failed.
    #[error("{0}")]
    DataSource(#[from] DataSourceError),

    /// Service configuration is invalid.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The selected appointment is not one of the candidates.
    #[error("Appointment '{appointment_id}' is not a candidate for record '{record_id}'")]
    UnknownAppointment {
        /// Record the selection was made for.
        record_id: String,
        /// The appointment id that was selected.
        appointment_id: String,
    },

    /// Logging could not be initialised.
    #[error("Logging error: {0}")]
    Logging(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// The specific structural fault found in a rule node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleFault {
    /// The operator is not one of the supported comparison operators.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// The composite logic is neither `AND` nor `OR`.
    #[error("unknown composite logic '{0}'")]
    UnknownLogic(String),

    /// A leaf has no `field` to look up.
    #[error("leaf rule is missing 'field'")]
    MissingField,

    /// A leaf has no `operator`.
    #[error("leaf rule is missing 'operator'")]
    MissingOperator,

    /// A comparison leaf has no `value` to compare against.
    #[error("operator '{0}' requires a 'value'")]
    MissingValue(String),

    /// A composite has no `logic`.
    #[error("composite rule is missing 'logic'")]
    MissingLogic,

    /// A node carries both leaf and composite keys.
    #[error("rule node mixes leaf and composite keys")]
    AmbiguousNode,

    /// A node carries neither leaf nor composite keys.
    #[error("rule node is neither a leaf nor a composite")]
    EmptyNode,
}

/// Error raised when a rule configuration is malformed.
///
/// `path` locates the faulty node inside the tree, starting at `$` for the
/// root (e.g. `$.children[1]`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{fault} at {path}")]
pub struct RuleConfigError {
    /// Location of the faulty node.
    pub path: String,
    /// What is wrong with it.
    pub fault: RuleFault,
}

impl RuleConfigError {
    /// Creates a new rule configuration error.
    #[must_use]
    pub fn new(path: impl Into<String>, fault: RuleFault) -> Self {
        Self {
            path: path.into(),
            fault,
        }
    }
}

/// The input snapshot a data source was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataInput {
    /// Checklist items of a stage.
    ChecklistItems,
    /// Checklist completion state of a record.
    CompletionMap,
    /// Number of records currently in a stage.
    Occupancy,
    /// Active criteria of a stage.
    Criteria,
    /// Appointments of a record.
    Appointments,
}

impl fmt::Display for DataInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecklistItems => write!(f, "checklist items"),
            Self::CompletionMap => write!(f, "checklist completion"),
            Self::Occupancy => write!(f, "stage occupancy"),
            Self::Criteria => write!(f, "stage criteria"),
            Self::Appointments => write!(f, "appointments"),
        }
    }
}

/// Error raised when an external collaborator fails to deliver an input.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// The fetch itself failed.
    #[error("Failed to fetch {input}: {source}")]
    Fetch {
        /// Which input failed.
        input: DataInput,
        /// Underlying failure.
        #[source]
        source: anyhow::Error,
    },

    /// The fetch did not complete in time.
    #[error("Timed out fetching {input} after {timeout_ms}ms")]
    Timeout {
        /// Which input timed out.
        input: DataInput,
        /// The configured bound.
        timeout_ms: u64,
    },
}

impl DataSourceError {
    /// Returns the input that failed.
    #[must_use]
    pub fn input(&self) -> DataInput {
        match self {
            Self::Fetch { input, .. } | Self::Timeout { input, .. } => *input,
        }
    }
}
