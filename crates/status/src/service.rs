// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Service-level wiring of reporter, aggregator, and the fatal-error channel.

use crate::aggregator::Aggregator;
use crate::error::Error;
use crate::event::{Status, StatusEvent};
use crate::instance::{InstanceId, InstanceKey};
use crate::reporter::Reporter;
use std::sync::Arc;

/// An accepted FatalError, surfaced out-of-band for the host.
///
/// The host consumes these from [`StatusService::fatal_errors`] and initiates
/// orderly process shutdown.
#[derive(Debug, Clone)]
pub struct FatalSignal {
    /// The instance that reported the fatal error.
    pub source: Arc<InstanceId>,
    /// The reported error message.
    pub message: String,
}

/// Owns the status subsystem the way the collector host wires it together.
///
/// The reporter's sink forwards every accepted event to the aggregator and
/// mirrors accepted FatalError events onto the fatal-error channel, exactly
/// once per accepted event (the transition graph makes FatalError terminal,
/// so an instance can contribute at most one).
pub struct StatusService {
    reporter: Arc<Reporter>,
    aggregator: Arc<Aggregator>,
    fatal_rx: flume::Receiver<FatalSignal>,
}

impl StatusService {
    /// Builds the reporter/aggregator pair and the fatal-error channel.
    ///
    /// `verbose` is the snapshot verbosity from the health-check settings.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        let aggregator = Arc::new(Aggregator::new(verbose));
        let (fatal_tx, fatal_rx) = flume::unbounded();
        let sink_aggregator = Arc::clone(&aggregator);
        let reporter = Arc::new(Reporter::new(move |key, id, event| {
            sink_aggregator.status_changed(key, id, event);
            if event.status() == Status::FatalError {
                tracing::warn!(
                    component = %id,
                    error = event.error().unwrap_or_default(),
                    "component reported a fatal error"
                );
                let _ = fatal_tx.send(FatalSignal {
                    source: Arc::clone(id),
                    message: event.error().unwrap_or_default().to_owned(),
                });
            }
        }));
        Self {
            reporter,
            aggregator,
            fatal_rx,
        }
    }

    /// Registers an instance and returns its per-component reporting adapter.
    #[must_use]
    pub fn handle_for(&self, id: InstanceId) -> StatusHandle {
        StatusHandle {
            key: self.reporter.register(id),
            reporter: Arc::clone(&self.reporter),
        }
    }

    /// Enables reporting, once all components are constructed.
    pub fn ready(&self) {
        self.reporter.ready();
    }

    /// The shared reporter.
    #[must_use]
    pub fn reporter(&self) -> Arc<Reporter> {
        Arc::clone(&self.reporter)
    }

    /// The shared aggregator, for snapshot consumers.
    #[must_use]
    pub fn aggregator(&self) -> Arc<Aggregator> {
        Arc::clone(&self.aggregator)
    }

    /// A receiver of fatal-error signals; clone freely.
    #[must_use]
    pub fn fatal_errors(&self) -> flume::Receiver<FatalSignal> {
        self.fatal_rx.clone()
    }
}

/// Narrow adapter a single component instance reports through.
///
/// Closes over the instance's key, so component code never handles
/// identities other than its own.
#[derive(Clone)]
pub struct StatusHandle {
    key: InstanceKey,
    reporter: Arc<Reporter>,
}

impl StatusHandle {
    /// Creates a handle for an instance already registered with `reporter`.
    ///
    /// Hosts wiring a bare [`Reporter`] use this directly;
    /// [`StatusService::handle_for`] combines registration and handle
    /// creation.
    #[must_use]
    pub fn new(reporter: Arc<Reporter>, key: InstanceKey) -> Self {
        Self { key, reporter }
    }

    /// Reports a status event for this instance.
    pub fn report(&self, event: StatusEvent) -> Result<(), Error> {
        self.reporter.report(self.key, event)
    }

    /// Reports a status event only when `predicate` holds for the current
    /// status.
    pub fn report_if(
        &self,
        event: StatusEvent,
        predicate: impl Fn(Status) -> bool,
    ) -> Result<(), Error> {
        self.reporter.report_if(self.key, event, predicate)
    }

    /// This instance's opaque key.
    #[must_use]
    pub const fn key(&self) -> InstanceKey {
        self.key
    }
}
