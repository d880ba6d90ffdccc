// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! The health-check request handler.

use crate::AppState;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use pulse_status::{Snapshot, Status};

/// Serves the current health snapshot.
///
/// The body is the JSON snapshot tree; the response code is derived from the
/// overall aggregate status.
pub(crate) async fn serve_health(State(state): State<AppState>) -> (StatusCode, Json<Snapshot>) {
    let snapshot = state.aggregator.current();
    (http_status_for(snapshot.status()), Json(snapshot))
}

/// The HTTP response code for an overall aggregate status.
#[must_use]
pub fn http_status_for(status: Status) -> StatusCode {
    match status {
        Status::Ok => StatusCode::OK,
        Status::PermanentError => StatusCode::BAD_REQUEST,
        Status::FatalError => StatusCode::INTERNAL_SERVER_ERROR,
        Status::None
        | Status::Starting
        | Status::RecoverableError
        | Status::Stopping
        | Status::Stopped => StatusCode::SERVICE_UNAVAILABLE,
    }
}
