// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Per-instance lifecycle state machine.

use crate::error::Error;
use crate::event::{Status, StatusEvent};

/// Returns whether `to` is a permitted successor of `from`.
///
/// Re-entering the same status is not permitted; PermanentError, FatalError,
/// and Stopped have no successors.
const fn transition_allowed(from: Status, to: Status) -> bool {
    matches!(
        (from, to),
        (Status::None, Status::Starting)
            | (
                Status::Starting,
                Status::Ok
                    | Status::RecoverableError
                    | Status::PermanentError
                    | Status::FatalError
                    | Status::Stopping
            )
            | (
                Status::Ok,
                Status::RecoverableError
                    | Status::PermanentError
                    | Status::FatalError
                    | Status::Stopping
            )
            | (
                Status::RecoverableError,
                Status::Ok | Status::PermanentError | Status::FatalError | Status::Stopping
            )
            | (
                Status::Stopping,
                Status::RecoverableError
                    | Status::PermanentError
                    | Status::FatalError
                    | Status::Stopped
            )
    )
}

/// The state machine tracking one instance's most recent accepted status.
///
/// Owned by the reporter and mutated only under its lock.
#[derive(Debug)]
pub(crate) struct InstanceFsm {
    current: StatusEvent,
}

impl InstanceFsm {
    /// A fresh machine in status `None`.
    pub(crate) fn new() -> Self {
        Self {
            current: StatusEvent::new(Status::None),
        }
    }

    /// The most recent accepted event.
    pub(crate) fn current(&self) -> &StatusEvent {
        &self.current
    }

    /// Attempts a transition to the status carried by `event`.
    ///
    /// Malformed events are rejected before the transition lookup; invalid
    /// transitions leave `current` unchanged.
    pub(crate) fn transition(&mut self, event: StatusEvent) -> Result<(), Error> {
        event.validate()?;
        if !transition_allowed(self.current.status(), event.status()) {
            return Err(Error::InvalidTransition {
                from: self.current.status(),
                to: event.status(),
            });
        }
        self.current = event;
        Ok(())
    }
}
