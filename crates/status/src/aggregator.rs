// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Priority-max aggregation of instance statuses per pipeline and overall.

use crate::event::{Status, StatusEvent};
use crate::instance::{InstanceId, InstanceKey};
use crate::snapshot::{Snapshot, SnapshotEntry};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use pulse_config::{ComponentKind, PipelineId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Key a status event aggregates under.
///
/// Extensions have no pipeline membership and aggregate under the reserved
/// pseudo-pipeline instead of being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[allow(variant_size_differences)]
pub enum AggregationKey {
    /// A named pipeline.
    Pipeline(PipelineId),
    /// The pseudo-pipeline grouping all extensions.
    Extensions,
}

impl AggregationKey {
    /// The keys affected by an event from the given instance.
    fn affected_by(id: &InstanceId) -> Vec<AggregationKey> {
        if id.kind() == ComponentKind::Extension {
            vec![AggregationKey::Extensions]
        } else {
            id.pipelines()
                .iter()
                .cloned()
                .map(AggregationKey::Pipeline)
                .collect()
        }
    }

    /// The snapshot-tree key: `pipeline:<id>`, or the literal `extensions`.
    #[must_use]
    pub fn as_string(&self) -> String {
        match self {
            AggregationKey::Pipeline(id) => format!("pipeline:{id}"),
            AggregationKey::Extensions => "extensions".to_owned(),
        }
    }
}

impl fmt::Display for AggregationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

struct InstanceEntry {
    id: Arc<InstanceId>,
    event: StatusEvent,
}

struct PipelineAggregate {
    aggregate: StatusEvent,
    instances: HashMap<InstanceKey, InstanceEntry>,
}

struct AggregatorState {
    overall: StatusEvent,
    pipelines: HashMap<AggregationKey, PipelineAggregate>,
}

/// Maintains the per-pipeline and overall aggregate statuses.
///
/// Wired as the reporter's notification sink; [`Aggregator::status_changed`]
/// is non-blocking and touches only this struct's own state, which is what
/// makes invoking it under the reporter's lock acceptable.
pub struct Aggregator {
    start_time: DateTime<Utc>,
    verbose: bool,
    state: RwLock<AggregatorState>,
}

impl Aggregator {
    /// Creates an empty aggregator.
    ///
    /// `verbose` controls whether snapshots carry the full
    /// pipeline/component tree; aggregation itself always maintains it.
    #[must_use]
    pub fn new(verbose: bool) -> Self {
        Self {
            start_time: Utc::now(),
            verbose,
            state: RwLock::new(AggregatorState {
                overall: StatusEvent::new(Status::None),
                pipelines: HashMap::new(),
            }),
        }
    }

    /// Records an accepted event and recomputes the affected aggregates.
    ///
    /// An instance participating in several pipelines contributes to each
    /// independently. The overall aggregate is recomputed from the pipeline
    /// aggregates, which is equivalent to aggregating the raw events under
    /// the priority rule.
    pub fn status_changed(&self, key: InstanceKey, id: &Arc<InstanceId>, event: &StatusEvent) {
        let affected = AggregationKey::affected_by(id);
        if affected.is_empty() {
            // A non-extension instance with no pipeline membership
            // contributes to no aggregate.
            return;
        }

        let mut guard = self.state.write();
        let state = &mut *guard;
        for agg_key in affected {
            let pipeline = state
                .pipelines
                .entry(agg_key)
                .or_insert_with(|| PipelineAggregate {
                    aggregate: StatusEvent::new(Status::None),
                    instances: HashMap::new(),
                });
            let _ = pipeline.instances.insert(
                key,
                InstanceEntry {
                    id: Arc::clone(id),
                    event: event.clone(),
                },
            );
            pipeline.aggregate = aggregate_events(pipeline.instances.values().map(|e| &e.event));
        }
        state.overall = aggregate_events(state.pipelines.values().map(|p| &p.aggregate));
    }

    /// The current overall aggregate status.
    #[must_use]
    pub fn overall_status(&self) -> Status {
        self.state.read().overall.status()
    }

    /// The current aggregate status of one pipeline, if any of its members
    /// ever reported.
    #[must_use]
    pub fn pipeline_status(&self, key: &AggregationKey) -> Option<Status> {
        self.state
            .read()
            .pipelines
            .get(key)
            .map(|p| p.aggregate.status())
    }

    /// Produces a point-in-time snapshot, independent of further mutation.
    ///
    /// In summary mode only the overall aggregate is rendered.
    #[must_use]
    pub fn current(&self) -> Snapshot {
        let state = self.state.read();
        let mut root = SnapshotEntry::from_event(&state.overall);
        if self.verbose {
            for (agg_key, pipeline) in &state.pipelines {
                let mut entry = SnapshotEntry::from_event(&pipeline.aggregate);
                for instance in pipeline.instances.values() {
                    let _ = entry
                        .components
                        .insert(instance.id.snapshot_key(), SnapshotEntry::from_event(&instance.event));
                }
                let _ = root.components.insert(agg_key.as_string(), entry);
            }
        }
        Snapshot {
            start_time: self.start_time,
            overall: root,
        }
    }
}

/// Aggregates a non-empty member set into a single representative event.
///
/// The representative carries the winning status and the latest timestamp
/// among the members matching it (falling back to all members when none
/// match, e.g. an {OK, Stopped} set aggregating to Stopping). For error
/// aggregates the error descriptor is taken from that member; which member
/// wins a timestamp tie is implementation-defined.
fn aggregate_events<'a, I>(events: I) -> StatusEvent
where
    I: Iterator<Item = &'a StatusEvent>,
{
    let events: Vec<&StatusEvent> = events.collect();
    let status = winning_status(&events);
    let representative = events
        .iter()
        .copied()
        .filter(|e| e.status() == status)
        .max_by(|a, b| a.time_order(b))
        .or_else(|| events.iter().copied().max_by(|a, b| a.time_order(b)));
    match representative {
        Some(member) => StatusEvent::from_parts(
            status,
            member.timestamp(),
            member.monotonic(),
            if status.is_error() {
                member.error().map(str::to_owned)
            } else {
                None
            },
        ),
        None => StatusEvent::new(status),
    }
}

/// The priority rule over a member set.
fn winning_status(events: &[&StatusEvent]) -> Status {
    let has = |status: Status| events.iter().any(|e| e.status() == status);
    let all = |status: Status| events.iter().all(|e| e.status() == status);
    if has(Status::FatalError) {
        Status::FatalError
    } else if has(Status::PermanentError) {
        Status::PermanentError
    } else if has(Status::RecoverableError) {
        Status::RecoverableError
    } else if !events.is_empty() && all(Status::Stopped) {
        Status::Stopped
    } else if has(Status::Stopping) || has(Status::Stopped) {
        Status::Stopping
    } else if has(Status::Starting) {
        Status::Starting
    } else if has(Status::None) && !all(Status::None) {
        // Startup smoothing: members that have not reported yet hold a
        // mixed aggregate at Starting.
        Status::Starting
    } else if !events.is_empty() && all(Status::Ok) {
        Status::Ok
    } else {
        Status::None
    }
}
