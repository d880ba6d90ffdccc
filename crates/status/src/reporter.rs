// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Entry point for component status reports.

use crate::error::Error;
use crate::event::{Status, StatusEvent};
use crate::fsm::InstanceFsm;
use crate::instance::{InstanceId, InstanceKey};
use parking_lot::{Mutex, RwLock};
use slotmap::SlotMap;
use std::sync::Arc;

/// Callback receiving each accepted status event, plus the initial `None`
/// status of every instance once the reporter is ready.
///
/// Invoked synchronously while the reporter's lock is held: implementations
/// must be non-blocking and must not report status back through the same
/// reporter.
pub type OnStatusChange = Box<dyn Fn(InstanceKey, &Arc<InstanceId>, &StatusEvent) + Send + Sync>;

struct Instance {
    id: Arc<InstanceId>,
    fsm: InstanceFsm,
}

/// Validates and records status reports from every component instance.
///
/// One coarse mutex guards the instance map and every machine's current
/// event, so accepted events for a single instance are totally ordered and
/// the sink observes each event before the corresponding report returns. The
/// ready gate sits behind its own reader-preferring lock since it is checked
/// on every report.
pub struct Reporter {
    instances: Mutex<SlotMap<InstanceKey, Instance>>,
    ready: RwLock<bool>,
    on_status_change: OnStatusChange,
}

impl Reporter {
    /// Creates a reporter forwarding accepted events to the given sink.
    #[must_use]
    pub fn new(
        on_status_change: impl Fn(InstanceKey, &Arc<InstanceId>, &StatusEvent) + Send + Sync + 'static,
    ) -> Self {
        Self {
            instances: Mutex::new(SlotMap::with_key()),
            ready: RwLock::new(false),
            on_status_change: Box::new(on_status_change),
        }
    }

    /// Registers a component instance and mints its handle.
    ///
    /// The instance starts in status `None` and is never removed for the
    /// lifetime of the reporter. Registration after [`Reporter::ready`]
    /// publishes the initial status to the sink immediately.
    pub fn register(&self, id: InstanceId) -> InstanceKey {
        let mut instances = self.instances.lock();
        let key = instances.insert(Instance {
            id: Arc::new(id),
            fsm: InstanceFsm::new(),
        });
        if self.is_ready() {
            let instance = &instances[key];
            (self.on_status_change)(key, &instance.id, instance.fsm.current());
        }
        key
    }

    /// Reports a status event for the given instance.
    ///
    /// Rejects with [`Error::NotReady`] until [`Reporter::ready`] was called,
    /// [`Error::MalformedEvent`] when the event's error descriptor disagrees
    /// with its status, and [`Error::InvalidTransition`] when the transition
    /// graph forbids the successor. On success the sink is invoked before
    /// this method returns.
    pub fn report(&self, key: InstanceKey, event: StatusEvent) -> Result<(), Error> {
        self.report_inner(key, event, |_| true)
    }

    /// Reports a status event only when `predicate` holds for the instance's
    /// current status.
    ///
    /// Returns `Ok(())` without a transition or notification when the
    /// predicate declines; used for conditional recovery such as "move to OK
    /// only if currently RecoverableError".
    pub fn report_if(
        &self,
        key: InstanceKey,
        event: StatusEvent,
        predicate: impl Fn(Status) -> bool,
    ) -> Result<(), Error> {
        self.report_inner(key, event, predicate)
    }

    fn report_inner(
        &self,
        key: InstanceKey,
        event: StatusEvent,
        predicate: impl Fn(Status) -> bool,
    ) -> Result<(), Error> {
        if !self.is_ready() {
            return Err(Error::NotReady);
        }
        let mut instances = self.instances.lock();
        let instance = instances.get_mut(key).ok_or(Error::UnknownInstance)?;
        if !predicate(instance.fsm.current().status()) {
            return Ok(());
        }
        instance.fsm.transition(event)?;
        let id = Arc::clone(&instance.id);
        (self.on_status_change)(key, &id, instance.fsm.current());
        Ok(())
    }

    /// Enables status reporting. Idempotent; the gate never closes again.
    ///
    /// The first call publishes every registered instance's current (still
    /// `None`) status to the sink, so aggregates account for components that
    /// have not reported yet.
    pub fn ready(&self) {
        let was_ready = {
            let mut ready = self.ready.write();
            std::mem::replace(&mut *ready, true)
        };
        if was_ready {
            return;
        }
        let instances = self.instances.lock();
        for (key, instance) in instances.iter() {
            (self.on_status_change)(key, &instance.id, instance.fsm.current());
        }
    }

    fn is_ready(&self) -> bool {
        *self.ready.read()
    }
}
