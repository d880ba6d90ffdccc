// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for configuration validation.

use thiserror::Error;

/// Errors that can occur while validating configuration.
#[derive(Error, Debug)]
pub enum Error {
    /// The configured health-check path does not begin with '/'.
    #[error("Invalid health check path '{path}': must begin with '/'")]
    InvalidPath {
        /// The rejected path.
        path: String,
    },

    /// The configured endpoint is empty.
    #[error("Health check endpoint must not be empty")]
    EmptyEndpoint,
}
