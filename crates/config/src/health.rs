// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Health-check service configuration.

use crate::error::Error;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default bind address for the health-check HTTP server.
///
/// 0.0.0.0 keeps the endpoint reachable from container orchestration
/// environments such as Kubernetes.
pub const DEFAULT_HEALTH_CHECK_ENDPOINT: &str = "0.0.0.0:13133";

/// Default path the health-check handler is mounted on.
pub const DEFAULT_HEALTH_CHECK_PATH: &str = "/";

/// Configuration for the health-check HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct HealthCheckSettings {
    /// host:port the health-check server binds to.
    pub endpoint: String,

    /// The path the health-check handler serves.
    pub path: String,

    /// Whether snapshots include the full pipeline/component tree or only
    /// the overall service status.
    pub verbose: bool,
}

impl Default for HealthCheckSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_HEALTH_CHECK_ENDPOINT.to_owned(),
            path: DEFAULT_HEALTH_CHECK_PATH.to_owned(),
            verbose: true,
        }
    }
}

impl HealthCheckSettings {
    /// Validates the settings.
    pub fn validate(&self) -> Result<(), Error> {
        if self.endpoint.is_empty() {
            return Err(Error::EmptyEndpoint);
        }
        if !self.path.starts_with('/') {
            return Err(Error::InvalidPath {
                path: self.path.clone(),
            });
        }
        Ok(())
    }
}
