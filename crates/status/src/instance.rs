// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Identity of running component instances.

use pulse_config::{ComponentId, ComponentKind, ComponentTypeId, PipelineId};
use slotmap::new_key_type;
use std::fmt;

new_key_type! {
    /// Opaque handle identifying one registered component instance.
    ///
    /// Minted by [`crate::reporter::Reporter::register`]. Two registrations of
    /// structurally-equal descriptors yield distinct keys, keeping two
    /// instances of the same configured component separate.
    pub struct InstanceKey;
}

/// Descriptor of one running occurrence of a configured component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceId {
    kind: ComponentKind,
    component_type: ComponentTypeId,
    component_id: ComponentId,
    pipelines: Vec<PipelineId>,
}

impl InstanceId {
    /// Creates a descriptor with no pipeline membership.
    ///
    /// Extensions stay this way; pipeline components add their memberships
    /// with [`InstanceId::with_pipelines`].
    #[must_use]
    pub fn new(
        kind: ComponentKind,
        component_type: impl Into<ComponentTypeId>,
        component_id: impl Into<ComponentId>,
    ) -> Self {
        Self {
            kind,
            component_type: component_type.into(),
            component_id: component_id.into(),
            pipelines: Vec::new(),
        }
    }

    /// Sets the pipelines this instance participates in.
    #[must_use]
    pub fn with_pipelines<I, P>(mut self, pipelines: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PipelineId>,
    {
        self.pipelines = pipelines.into_iter().map(Into::into).collect();
        self
    }

    /// The component kind.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// The component type (e.g. "otlp").
    #[must_use]
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// The configured component id (e.g. "otlp/replica-2").
    #[must_use]
    pub fn component_id(&self) -> &str {
        &self.component_id
    }

    /// The pipelines this instance participates in; empty for extensions.
    #[must_use]
    pub fn pipelines(&self) -> &[PipelineId] {
        &self.pipelines
    }

    /// The `<kind>:<component_id>` key used in snapshot trees.
    #[must_use]
    pub fn snapshot_key(&self) -> String {
        format!("{}:{}", self.kind, self.component_id)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.component_id)
    }
}
