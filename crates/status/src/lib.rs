// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Component status state for collector pipelines.
//!
//! Every component instance of the collector (receivers, processors,
//! exporters, extensions) reports lifecycle and error events through a
//! [`reporter::Reporter`]. Each accepted event passes a per-instance state
//! machine, is fanned out to the notification sink, and is rolled up by the
//! [`aggregator::Aggregator`] into per-pipeline and overall statuses by
//! severity. [`aggregator::Aggregator::current`] renders the result as an
//! immutable [`snapshot::Snapshot`] tree for health probes.
//!
//! The subsystem is a passive in-memory observer: it performs no I/O, keeps
//! no history beyond the most recent event per instance, and never schedules
//! retries or restarts on its own.

pub mod aggregator;
pub mod error;
pub mod event;
mod fsm;
pub mod instance;
pub mod reporter;
pub mod service;
pub mod snapshot;

pub use aggregator::{AggregationKey, Aggregator};
pub use error::Error;
pub use event::{Status, StatusEvent};
pub use instance::{InstanceId, InstanceKey};
pub use reporter::Reporter;
pub use service::{FatalSignal, StatusHandle, StatusService};
pub use snapshot::{Snapshot, SnapshotEntry};
