//! Async boundary that gathers movement inputs and validates them.
//!
//! The gates themselves are pure and synchronous. This module owns the part
//! that is not: fetching snapshots from external collaborators. A failed or
//! timed-out fetch becomes [`MovementOutcome::Unavailable`] and the
//! orchestrator is never called with partial data.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::core::{
    Appointment, ChecklistItem, CompletionMap, Criterion, PipelineEntry, Stage, TransitionVerdict,
};
use crate::dedup::NotificationCache;
use crate::errors::{DataInput, DataSourceError, StagegateError};
use crate::events::{
    EventSink, NoOpEventSink, MOVEMENT_BLOCKED, MOVEMENT_UNAVAILABLE, MOVEMENT_VALIDATED,
};
use crate::movement::{validate_movement, MovementRequest};
use crate::utils::{generate_validation_id, iso_timestamp};

/// Message shown when a move could not be validated.
pub const UNAVAILABLE_MESSAGE: &str = "Could not validate this move, try again";

/// Source of the snapshots a movement is validated against.
///
/// The checklist is the one of the stage being left; occupancy and criteria
/// are those of the target stage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransitionDataSource: Send + Sync {
    /// Checklist items of a stage.
    async fn checklist_items(&self, stage_id: &str) -> anyhow::Result<Vec<ChecklistItem>>;

    /// Checklist completion of a record in a stage.
    async fn completion_map(&self, record_id: &str, stage_id: &str)
        -> anyhow::Result<CompletionMap>;

    /// Number of records currently in a stage.
    async fn stage_occupancy(&self, stage_id: &str) -> anyhow::Result<u32>;

    /// Criteria attached to a stage.
    async fn active_criteria(&self, stage_id: &str) -> anyhow::Result<Vec<Criterion>>;

    /// All appointments of a record, any status.
    async fn appointments(&self, record_id: &str) -> anyhow::Result<Vec<Appointment>>;
}

/// What the caller should show for a movement attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MovementOutcome {
    /// The move may be committed.
    Allowed(TransitionVerdict),
    /// A gate blocks the move.
    Blocked(TransitionVerdict),
    /// An input could not be fetched; nothing was decided.
    Unavailable {
        /// The input that failed.
        input: DataInput,
        /// Operator-facing reason.
        reason: String,
    },
}

impl MovementOutcome {
    /// Wraps a verdict.
    #[must_use]
    pub fn from_verdict(verdict: TransitionVerdict) -> Self {
        if verdict.can_move {
            Self::Allowed(verdict)
        } else {
            Self::Blocked(verdict)
        }
    }

    /// Returns the verdict, if validation ran.
    #[must_use]
    pub fn verdict(&self) -> Option<&TransitionVerdict> {
        match self {
            Self::Allowed(verdict) | Self::Blocked(verdict) => Some(verdict),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns true if the move may be committed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Returns the user-facing summary.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Allowed(_) => "This move is allowed".to_string(),
            Self::Blocked(verdict) => {
                format!("This move is not allowed: {}", verdict.blockers.join("; "))
            }
            Self::Unavailable { .. } => UNAVAILABLE_MESSAGE.to_string(),
        }
    }
}

/// Fetches movement inputs from a [`TransitionDataSource`] and validates them.
///
/// The service owns its notification cache; two services never share
/// deduplication state.
pub struct MovementService<S> {
    source: Arc<S>,
    sink: Arc<dyn EventSink>,
    config: ServiceConfig,
    notifications: NotificationCache,
}

impl<S: TransitionDataSource> MovementService<S> {
    /// Creates a service. Events are discarded until a sink is set.
    pub fn new(source: Arc<S>, config: ServiceConfig) -> Result<Self, StagegateError> {
        config.validate()?;
        let notifications =
            NotificationCache::new(config.notification_ttl(), config.notification_capacity);
        Ok(Self {
            source,
            sink: Arc::new(NoOpEventSink),
            config,
            notifications,
        })
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Fetches every input of a movement concurrently.
    ///
    /// Appointments are only fetched when the target stage requires one.
    pub async fn gather(
        &self,
        entry: &PipelineEntry,
        from: &Stage,
        to: &Stage,
    ) -> Result<MovementRequest, DataSourceError> {
        let items = self.fetch(
            DataInput::ChecklistItems,
            self.source.checklist_items(&from.id),
        );
        let completion = self.fetch(
            DataInput::CompletionMap,
            self.source.completion_map(&entry.id, &from.id),
        );
        let occupancy = self.fetch(DataInput::Occupancy, self.source.stage_occupancy(&to.id));
        let criteria = self.fetch(DataInput::Criteria, self.source.active_criteria(&to.id));
        let appointments = async {
            if to.requires_appointment {
                self.fetch(DataInput::Appointments, self.source.appointments(&entry.id))
                    .await
            } else {
                Ok(Vec::new())
            }
        };

        let (items, completion, occupancy, criteria, appointments) =
            tokio::try_join!(items, completion, occupancy, criteria, appointments)?;

        Ok(MovementRequest::new(entry.clone(), from.clone(), to.clone())
            .with_checklist(items, completion)
            .with_occupancy(occupancy)
            .with_criteria(criteria)
            .with_appointments(appointments))
    }

    /// Gathers inputs and validates the movement.
    pub async fn check(&self, entry: &PipelineEntry, from: &Stage, to: &Stage) -> MovementOutcome {
        let validation_id = generate_validation_id();
        let span = info_span!(
            "movement_check",
            %validation_id,
            record_id = %entry.id,
            from_stage = %from.id,
            to_stage = %to.id,
        );
        self.run_check(validation_id, entry, from, to)
            .instrument(span)
            .await
    }

    async fn run_check(
        &self,
        validation_id: Uuid,
        entry: &PipelineEntry,
        from: &Stage,
        to: &Stage,
    ) -> MovementOutcome {
        let request = match self.gather(entry, from, to).await {
            Ok(request) => request,
            Err(err) => {
                warn!(input = %err.input(), error = %err, "Movement inputs unavailable");
                self.emit(
                    MOVEMENT_UNAVAILABLE,
                    json!({
                        "validation_id": validation_id.to_string(),
                        "record_id": entry.id,
                        "from_stage": from.id,
                        "to_stage": to.id,
                        "input": err.input().to_string(),
                        "error": err.to_string(),
                        "at": iso_timestamp(),
                    }),
                )
                .await;
                return MovementOutcome::Unavailable {
                    input: err.input(),
                    reason: err.to_string(),
                };
            }
        };

        let verdict = validate_movement(&request);
        let payload = json!({
            "validation_id": validation_id.to_string(),
            "record_id": entry.id,
            "from_stage": from.id,
            "to_stage": to.id,
            "blockers": verdict.blockers,
            "warnings": verdict.warnings,
            "at": iso_timestamp(),
        });

        if verdict.can_move {
            info!(warnings = verdict.warnings.len(), "Movement allowed");
            self.emit(MOVEMENT_VALIDATED, payload).await;
        } else {
            info!(blockers = ?verdict.blockers, "Movement blocked");
            let mut parts = vec![entry.id.as_str(), to.id.as_str()];
            parts.extend(verdict.blockers.iter().map(String::as_str));
            if self.notifications.first_seen(&NotificationCache::key(&parts)) {
                self.emit(MOVEMENT_BLOCKED, payload).await;
            } else {
                debug!("Suppressing repeated blocked notification");
            }
        }

        MovementOutcome::from_verdict(verdict)
    }

    async fn fetch<T>(
        &self,
        input: DataInput,
        fut: impl Future<Output = anyhow::Result<T>>,
    ) -> Result<T, DataSourceError> {
        let result = match self.config.fetch_timeout() {
            Some(limit) => tokio::time::timeout(limit, fut).await.map_err(|_| {
                DataSourceError::Timeout {
                    input,
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                }
            })?,
            None => fut.await,
        };
        result.map_err(|source| DataSourceError::Fetch { input, source })
    }

    async fn emit(&self, event_type: &str, data: serde_json::Value) {
        if self.config.emit_events {
            self.sink.emit(event_type, Some(data)).await;
        }
    }
}
