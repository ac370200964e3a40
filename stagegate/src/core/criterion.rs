//! Stage criteria and their classification results.

use crate::errors::RuleConfigError;
use crate::rules::{RecordContext, RuleConfig, RuleNode};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// What a criterion measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriterionKind {
    /// A field stored on the record.
    RecordField,
    /// A computed activity metric (calls made, emails sent, ...).
    ActivityMetric,
    /// Time elapsed since some event.
    ElapsedTime,
    /// An aggregate over related records.
    RelationshipAggregate,
    /// A combination of the above.
    Composite,
}

impl CriterionKind {
    /// Returns false if this kind of criterion cannot apply to the record.
    #[must_use]
    pub fn applies_to(&self, context: &RecordContext) -> bool {
        match self {
            Self::RelationshipAggregate => context.supports_relationships(),
            Self::RecordField | Self::ActivityMetric | Self::ElapsedTime | Self::Composite => true,
        }
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RecordField => write!(f, "record_field"),
            Self::ActivityMetric => write!(f, "activity_metric"),
            Self::ElapsedTime => write!(f, "elapsed_time"),
            Self::RelationshipAggregate => write!(f, "relationship_aggregate"),
            Self::Composite => write!(f, "composite"),
        }
    }
}

/// A named, possibly required rule attached to a stage.
///
/// `config` is kept in its stored form; [`Criterion::validate`] turns it
/// into a typed [`RuleConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criterion {
    /// Criterion identity.
    pub id: String,
    /// Owning stage.
    pub stage_id: String,
    /// Display name used in messages.
    pub name: String,
    /// What the criterion measures.
    pub kind: CriterionKind,
    /// The rule tree, as stored.
    pub config: RuleNode,
    /// Whether failing the rule blocks the move.
    #[serde(default)]
    pub required: bool,
    /// Evaluation and display order.
    #[serde(default)]
    pub order: i32,
    /// Inactive criteria are ignored.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Typed rule, present when validated at construction.
    #[serde(skip)]
    rule: Option<RuleConfig>,
}

fn default_active() -> bool {
    true
}

impl Criterion {
    /// Creates a new required, active criterion.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        stage_id: impl Into<String>,
        name: impl Into<String>,
        kind: CriterionKind,
        config: impl Into<RuleNode>,
    ) -> Self {
        Self {
            id: id.into(),
            stage_id: stage_id.into(),
            name: name.into(),
            kind,
            config: config.into(),
            required: true,
            order: 0,
            active: true,
            rule: None,
        }
    }

    /// Creates a new required, active criterion, rejecting a malformed rule.
    ///
    /// The typed rule is kept, so classification does not validate it again.
    /// `config` must not be changed afterwards.
    pub fn try_new(
        id: impl Into<String>,
        stage_id: impl Into<String>,
        name: impl Into<String>,
        kind: CriterionKind,
        config: impl Into<RuleNode>,
    ) -> Result<Self, RuleConfigError> {
        let mut criterion = Self::new(id, stage_id, name, kind, config);
        criterion.rule = Some(criterion.validate()?);
        Ok(criterion)
    }

    /// Marks the criterion as optional.
    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Sets the order.
    #[must_use]
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// Marks the criterion as inactive.
    #[must_use]
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Validates the stored rule and returns its typed form.
    pub fn validate(&self) -> Result<RuleConfig, RuleConfigError> {
        RuleConfig::try_from(self.config.clone())
    }

    /// Returns the typed rule.
    ///
    /// Criteria built with [`Criterion::try_new`] hand out their validated
    /// rule; others (e.g. loaded from storage) are validated on each call.
    pub fn rule(&self) -> Result<Cow<'_, RuleConfig>, RuleConfigError> {
        match &self.rule {
            Some(rule) => Ok(Cow::Borrowed(rule)),
            None => self.validate().map(Cow::Owned),
        }
    }
}

/// Classification of a criterion against one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaStatus {
    /// Not decidable yet, or an optional rule that is not met.
    Pending,
    /// The rule holds.
    Satisfied,
    /// The criterion does not apply to this record.
    NotApplicable,
    /// The rule blocks the move.
    Blocked,
}

impl fmt::Display for CriteriaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Satisfied => write!(f, "satisfied"),
            Self::NotApplicable => write!(f, "not_applicable"),
            Self::Blocked => write!(f, "blocked"),
        }
    }
}

/// A criterion tagged with its status for one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaResult {
    /// The classified criterion.
    pub criterion_id: String,
    /// Display name of the criterion.
    pub name: String,
    /// Whether the criterion is required.
    pub required: bool,
    /// Classification.
    pub status: CriteriaStatus,
    /// Human-readable explanation.
    pub message: String,
}

impl CriteriaResult {
    /// Creates a result for `criterion` with the given status.
    #[must_use]
    pub fn new(criterion: &Criterion, status: CriteriaStatus, message: impl Into<String>) -> Self {
        Self {
            criterion_id: criterion.id.clone(),
            name: criterion.name.clone(),
            required: criterion.required,
            status,
            message: message.into(),
        }
    }

    /// Returns true if this result prevents the move.
    ///
    /// `blocked` always blocks. `pending` blocks only required criteria.
    #[must_use]
    pub fn is_blocking(&self) -> bool {
        match self.status {
            CriteriaStatus::Blocked => true,
            CriteriaStatus::Pending => self.required,
            CriteriaStatus::Satisfied | CriteriaStatus::NotApplicable => false,
        }
    }
}
