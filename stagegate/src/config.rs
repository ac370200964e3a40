//! Configuration for the movement service.

use crate::errors::StagegateError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for [`MovementService`](crate::service::MovementService).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Bound on each data-source fetch, in milliseconds. `None` waits forever.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
    /// How long a blocked notification suppresses identical repeats.
    #[serde(default = "default_notification_ttl")]
    pub notification_ttl_secs: u64,
    /// Maximum number of remembered notifications.
    #[serde(default = "default_notification_capacity")]
    pub notification_capacity: usize,
    /// Whether to emit movement events.
    #[serde(default = "default_emit_events")]
    pub emit_events: bool,
}

fn default_notification_ttl() -> u64 {
    3600
}

fn default_notification_capacity() -> usize {
    1024
}

fn default_emit_events() -> bool {
    true
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: None,
            notification_ttl_secs: default_notification_ttl(),
            notification_capacity: default_notification_capacity(),
            emit_events: default_emit_events(),
        }
    }
}

impl ServiceConfig {
    /// Creates a configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, StagegateError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the fetch timeout.
    #[must_use]
    pub fn with_fetch_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.fetch_timeout_ms = Some(timeout_ms);
        self
    }

    /// Sets the notification deduplication window.
    #[must_use]
    pub fn with_notification_ttl_secs(mut self, secs: u64) -> Self {
        self.notification_ttl_secs = secs;
        self
    }

    /// Sets the notification cache capacity.
    #[must_use]
    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }

    /// Enables or disables event emission.
    #[must_use]
    pub fn with_events(mut self, enabled: bool) -> Self {
        self.emit_events = enabled;
        self
    }

    /// Returns the fetch timeout as a `Duration`.
    #[must_use]
    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the notification TTL as a `Duration`.
    #[must_use]
    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), StagegateError> {
        if self.fetch_timeout_ms == Some(0) {
            return Err(StagegateError::Config(
                "fetch_timeout_ms must be positive when provided".to_string(),
            ));
        }
        if self.notification_ttl_secs == 0 {
            return Err(StagegateError::Config(
                "notification_ttl_secs must be >= 1".to_string(),
            ));
        }
        if self.notification_capacity == 0 {
            return Err(StagegateError::Config(
                "notification_capacity must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}
