//! The record moving through the pipeline.

use crate::rules::RecordContext;
use serde::{Deserialize, Serialize};

/// A record progressing through the stages of a pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PipelineEntry {
    /// Record identity.
    pub id: String,
    /// The stage the record currently sits in.
    pub stage_id: String,
    /// Flattened fields the criteria are evaluated against.
    #[serde(default)]
    pub context: RecordContext,
}

impl PipelineEntry {
    /// Creates an entry with an empty context.
    #[must_use]
    pub fn new(id: impl Into<String>, stage_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stage_id: stage_id.into(),
            context: RecordContext::new(),
        }
    }

    /// Sets the evaluation context.
    #[must_use]
    pub fn with_context(mut self, context: RecordContext) -> Self {
        self.context = context;
        self
    }
}
