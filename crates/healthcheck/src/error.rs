// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Error types for the health-check service.

use thiserror::Error;

/// Errors that can occur while running the health-check HTTP server.
#[derive(Error, Debug)]
pub enum Error {
    /// The health-check settings failed validation.
    #[error("Invalid health check settings: {0}")]
    InvalidSettings(#[from] pulse_config::error::Error),

    /// The configured endpoint is not a valid socket address.
    #[error("Invalid health check endpoint '{endpoint}': {details}")]
    InvalidEndpoint {
        /// The endpoint that failed to parse.
        endpoint: String,
        /// Human-readable details of the parsing failure.
        details: String,
    },

    /// Failed to bind the TCP listener on the given endpoint.
    #[error("Failed to bind health check server on '{endpoint}': {details}")]
    BindFailed {
        /// The endpoint we attempted to bind to.
        endpoint: String,
        /// Human-readable details of the bind failure.
        details: String,
    },

    /// The HTTP server encountered a fatal error while serving.
    #[error("Health check server error on '{endpoint}': {details}")]
    ServerError {
        /// The endpoint the server was bound to.
        endpoint: String,
        /// Human-readable details of the server failure.
        details: String,
    },
}
