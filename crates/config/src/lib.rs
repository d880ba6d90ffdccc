// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Configuration and shared identifiers for the pulse health subsystem.
//!
//! Data Model:
//! - service
//!   - pipelines (named chains of receivers, processors, and exporters)
//!     - component instances
//!   - extensions (service-wide components outside any pipeline)
//!
//! Component instances report their lifecycle status against these
//! identifiers; the health-check service aggregates per pipeline and
//! across the whole service.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

pub mod error;
pub mod health;

/// The id of a pipeline (e.g. "traces", "metrics/prod").
pub type PipelineId = Cow<'static, str>;

/// The type of a component (e.g. "otlp").
pub type ComponentTypeId = Cow<'static, str>;

/// The configured id of a component instance (e.g. "otlp", "otlp/replica-2").
pub type ComponentId = Cow<'static, str>;

/// The kind of a configured component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    /// A component that receives telemetry at the head of a pipeline.
    Receiver,
    /// A component that transforms telemetry inside a pipeline.
    Processor,
    /// A component that emits telemetry at the tail of a pipeline.
    Exporter,
    /// A service-wide component that does not participate in any pipeline.
    Extension,
}

impl ComponentKind {
    /// Returns the lowercase name used in snapshot keys and logs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Receiver => "receiver",
            ComponentKind::Processor => "processor",
            ComponentKind::Exporter => "exporter",
            ComponentKind::Extension => "extension",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
