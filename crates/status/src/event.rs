// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Component lifecycle statuses and the events that carry them.

use crate::error::Error;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::time::Instant;

/// Lifecycle status of a component instance.
///
/// Variants are ordered by lifecycle; [`Status::priority`] gives the
/// severity ordering used for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The instance is known but was never started.
    None,
    /// Start was invoked but the instance is not yet ready.
    Starting,
    /// The instance is functioning normally.
    #[serde(rename = "OK")]
    Ok,
    /// The instance hit a transient fault and may return to OK.
    RecoverableError,
    /// Terminal: the same inputs will always fail.
    PermanentError,
    /// Terminal: the process must terminate.
    FatalError,
    /// Orderly shutdown is in progress.
    Stopping,
    /// Shutdown is complete.
    Stopped,
}

impl Status {
    /// Severity used by aggregation: higher wins.
    #[must_use]
    pub const fn priority(&self) -> u8 {
        match self {
            Status::None => 0,
            Status::Starting => 1,
            Status::Ok => 2,
            Status::RecoverableError => 3,
            Status::PermanentError => 4,
            Status::FatalError => 5,
            Status::Stopping => 6,
            Status::Stopped => 7,
        }
    }

    /// True for the three error statuses, which require an error descriptor.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(
            self,
            Status::RecoverableError | Status::PermanentError | Status::FatalError
        )
    }

    /// True for statuses with no outgoing transitions.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            Status::PermanentError | Status::FatalError | Status::Stopped
        )
    }

    /// The exact name used in snapshots and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Status::None => "None",
            Status::Starting => "Starting",
            Status::Ok => "OK",
            Status::RecoverableError => "RecoverableError",
            Status::PermanentError => "PermanentError",
            Status::FatalError => "FatalError",
            Status::Stopping => "Stopping",
            Status::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single status report from a component instance.
///
/// Carries the wall-clock time the event was produced plus a monotonic
/// timestamp. Wall time is what snapshots expose; the monotonic reading only
/// breaks ordering ties when the wall clock steps backwards.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    status: Status,
    timestamp: DateTime<Utc>,
    monotonic: Instant,
    error: Option<String>,
}

impl StatusEvent {
    /// Creates an event with the given status and no error descriptor.
    ///
    /// The result is malformed for error statuses; [`StatusEvent::validate`]
    /// (called on every report) rejects such events.
    #[must_use]
    pub fn new(status: Status) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            monotonic: Instant::now(),
            error: None,
        }
    }

    /// Creates an event with the given status and error descriptor.
    #[must_use]
    pub fn with_error(status: Status, error: impl Into<String>) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            monotonic: Instant::now(),
            error: Some(error.into()),
        }
    }

    /// A `Starting` event.
    #[must_use]
    pub fn starting() -> Self {
        Self::new(Status::Starting)
    }

    /// An `OK` event.
    #[must_use]
    pub fn ok() -> Self {
        Self::new(Status::Ok)
    }

    /// A `RecoverableError` event with the given error descriptor.
    #[must_use]
    pub fn recoverable_error(error: impl Into<String>) -> Self {
        Self::with_error(Status::RecoverableError, error)
    }

    /// A `PermanentError` event with the given error descriptor.
    #[must_use]
    pub fn permanent_error(error: impl Into<String>) -> Self {
        Self::with_error(Status::PermanentError, error)
    }

    /// A `FatalError` event with the given error descriptor.
    #[must_use]
    pub fn fatal_error(error: impl Into<String>) -> Self {
        Self::with_error(Status::FatalError, error)
    }

    /// A `Stopping` event.
    #[must_use]
    pub fn stopping() -> Self {
        Self::new(Status::Stopping)
    }

    /// A `Stopped` event.
    #[must_use]
    pub fn stopped() -> Self {
        Self::new(Status::Stopped)
    }

    /// Assembles an aggregate representative from parts.
    pub(crate) fn from_parts(
        status: Status,
        timestamp: DateTime<Utc>,
        monotonic: Instant,
        error: Option<String>,
    ) -> Self {
        Self {
            status,
            timestamp,
            monotonic,
            error,
        }
    }

    /// The status carried by this event.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Wall-clock time the event was produced.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Monotonic reading taken when the event was produced.
    #[must_use]
    pub const fn monotonic(&self) -> Instant {
        self.monotonic
    }

    /// The error descriptor, present exactly for error statuses.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Rejects events whose error descriptor disagrees with their status.
    pub fn validate(&self) -> Result<(), Error> {
        if self.status.is_error() != self.error.is_some() {
            return Err(Error::MalformedEvent {
                status: self.status,
                has_error: self.error.is_some(),
            });
        }
        Ok(())
    }

    /// Orders two events by wall time, breaking ties monotonically.
    #[must_use]
    pub fn time_order(&self, other: &Self) -> Ordering {
        self.timestamp
            .cmp(&other.timestamp)
            .then(self.monotonic.cmp(&other.monotonic))
    }
}
