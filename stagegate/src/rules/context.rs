//! The record snapshot rules are evaluated against.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Flattened field map of a record plus what the record type supports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordContext {
    /// Field values, keyed by flattened name (`score`, `company.size`).
    #[serde(default)]
    pub fields: Map<String, Value>,
    /// Whether the record type has relationships at all.
    #[serde(default = "default_supports_relationships")]
    pub supports_relationships: bool,
    /// Fields whose values have not been computed yet.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub pending_fields: BTreeSet<String>,
}

fn default_supports_relationships() -> bool {
    true
}

impl Default for RecordContext {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordContext {
    /// Creates an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Map::new(),
            supports_relationships: true,
            pending_fields: BTreeSet::new(),
        }
    }

    /// Creates a context from a JSON object. Returns `None` for other values.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self {
                fields,
                ..Self::new()
            }),
            _ => None,
        }
    }

    /// Sets a field value.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Declares that the record type has no relationships.
    #[must_use]
    pub fn without_relationships(mut self) -> Self {
        self.supports_relationships = false;
        self
    }

    /// Declares a field whose value has not been computed yet.
    #[must_use]
    pub fn with_pending_field(mut self, name: impl Into<String>) -> Self {
        self.pending_fields.insert(name.into());
        self
    }

    /// Returns whether the record type has relationships.
    #[must_use]
    pub fn supports_relationships(&self) -> bool {
        self.supports_relationships
    }

    /// Returns true if `field` is declared as not yet computed.
    #[must_use]
    pub fn is_pending(&self, field: &str) -> bool {
        self.pending_fields.contains(field)
    }

    /// Looks up a non-null field value.
    ///
    /// The exact key wins; otherwise the name is followed as a dotted path
    /// through nested objects.
    #[must_use]
    pub fn lookup(&self, field: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(field) {
            return non_null(value);
        }

        let mut segments = field.split('.');
        let mut current = self.fields.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        non_null(current)
    }
}

fn non_null(value: &Value) -> Option<&Value> {
    if value.is_null() {
        None
    } else {
        Some(value)
    }
}
