// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time snapshots of the aggregate health state.

use crate::event::{Status, StatusEvent};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An immutable view of the service health tree.
///
/// Produced by [`crate::aggregator::Aggregator::current`]; owns all of its
/// data, so callers can serialize it without further coordination. Errors
/// serialize as their message strings only, which makes the JSON round-trip
/// lossy for error values by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Time the service (aggregator) was created.
    pub start_time: DateTime<Utc>,

    /// The overall aggregate, with the pipeline tree in verbose mode.
    #[serde(flatten)]
    pub overall: SnapshotEntry,
}

/// One node of the snapshot tree: the overall root, a pipeline aggregate, or
/// a single component instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// The status at this node.
    pub status: Status,

    /// The error message, present for error statuses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Time of the event this node's status was taken from.
    pub status_time: DateTime<Utc>,

    /// Child nodes: `pipeline:<id>` / `extensions` under the root,
    /// `<kind>:<component_id>` under a pipeline.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub components: BTreeMap<String, SnapshotEntry>,
}

impl SnapshotEntry {
    /// A leaf entry copied from an event.
    #[must_use]
    pub fn from_event(event: &StatusEvent) -> Self {
        Self {
            status: event.status(),
            error: event.error().map(str::to_owned),
            status_time: event.timestamp(),
            components: BTreeMap::new(),
        }
    }
}

impl Snapshot {
    /// The overall aggregate status.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.overall.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_and_components_are_omitted_when_absent() {
        let snapshot = Snapshot {
            start_time: Utc::now(),
            overall: SnapshotEntry::from_event(&StatusEvent::ok()),
        };
        let value = serde_json::to_value(&snapshot).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(object.contains_key("start_time"));
        assert!(object.contains_key("status_time"));
        assert_eq!(object["status"], "OK");
        assert!(!object.contains_key("error"));
        assert!(!object.contains_key("components"));
    }

    #[test]
    fn error_message_serializes_for_error_statuses() {
        let entry = SnapshotEntry::from_event(&StatusEvent::recoverable_error("conn reset"));
        let value = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(value["status"], "RecoverableError");
        assert_eq!(value["error"], "conn reset");
    }
}
