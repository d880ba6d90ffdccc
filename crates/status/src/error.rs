// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for status reporting.

use crate::event::Status;
use thiserror::Error;

/// Errors returned to a component reporting its status.
///
/// All errors are returned synchronously to the reporting caller; rejected
/// events are never forwarded to the aggregation sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Status was reported before the reporter was marked ready.
    #[error("Cannot report component status before service start")]
    NotReady,

    /// The requested successor status is not reachable from the current one.
    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        /// The instance's current status.
        from: Status,
        /// The rejected successor status.
        to: Status,
    },

    /// The event's error descriptor disagrees with its status.
    #[error("Malformed status event for {status} (error descriptor present: {has_error})")]
    MalformedEvent {
        /// The status carried by the malformed event.
        status: Status,
        /// Whether the event carried an error descriptor.
        has_error: bool,
    },

    /// The instance handle was never registered with this reporter.
    #[error("Unknown component instance handle")]
    UnknownInstance,
}
