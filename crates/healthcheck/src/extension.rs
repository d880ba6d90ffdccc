// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! The health-check extension.
//!
//! Serves the aggregate snapshot over HTTP and reports its own lifecycle
//! through the status service like any other component instance.

use crate::error::Error;
use pulse_config::ComponentKind;
use pulse_config::health::HealthCheckSettings;
use pulse_status::{Aggregator, InstanceId, StatusEvent, StatusHandle};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Component type and id the extension is configured under.
const COMPONENT_NAME: &str = "healthcheck";

/// Runs the health-check HTTP server as a collector extension.
pub struct HealthCheckExtension {
    settings: HealthCheckSettings,
    handle: StatusHandle,
    cancel: CancellationToken,
}

impl HealthCheckExtension {
    /// The descriptor the host registers this extension under.
    #[must_use]
    pub fn instance_id() -> InstanceId {
        InstanceId::new(ComponentKind::Extension, COMPONENT_NAME, COMPONENT_NAME)
    }

    /// Creates the extension from its settings and reporting handle.
    #[must_use]
    pub fn new(settings: HealthCheckSettings, handle: StatusHandle) -> Self {
        Self {
            settings,
            handle,
            cancel: CancellationToken::new(),
        }
    }

    /// Binds the configured endpoint and starts serving on a background task.
    ///
    /// Reports OK only once the listener is bound; a failed bind reports
    /// FatalError and returns the error without spawning anything. A server
    /// failure after startup also reports FatalError. The host reports
    /// Starting before invoking this, as it does for every component.
    pub async fn start(
        &self,
        aggregator: Arc<Aggregator>,
    ) -> Result<JoinHandle<Result<(), Error>>, Error> {
        let listener = match crate::bind(&self.settings).await {
            Ok(listener) => listener,
            Err(err) => {
                report_own_status(&self.handle, StatusEvent::fatal_error(err.to_string()));
                return Err(err);
            }
        };
        report_own_status(&self.handle, StatusEvent::ok());

        let path = self.settings.path.clone();
        let handle = self.handle.clone();
        let cancel = self.cancel.clone();
        Ok(tokio::spawn(async move {
            match crate::serve(listener, &path, aggregator, cancel).await {
                Ok(()) => Ok(()),
                Err(err) => {
                    report_own_status(&handle, StatusEvent::fatal_error(err.to_string()));
                    Err(err)
                }
            }
        }))
    }

    /// Requests graceful shutdown of the server task.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }
}

fn report_own_status(handle: &StatusHandle, event: StatusEvent) {
    if let Err(err) = handle.report(event) {
        tracing::debug!(error = %err, "health check status report rejected");
    }
}
