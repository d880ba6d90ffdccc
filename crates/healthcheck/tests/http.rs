// Copyright The OpenTelemetry Authors
// SPDX-License-Identifier: Apache-2.0

//! Request-level tests of the health-check endpoint and extension.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use pulse_config::ComponentKind;
use pulse_config::health::HealthCheckSettings;
use pulse_healthcheck::extension::HealthCheckExtension;
use pulse_status::{
    AggregationKey, Aggregator, InstanceId, Reporter, Status, StatusEvent, StatusHandle,
    StatusService,
};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn traces_service(verbose: bool) -> (StatusService, StatusHandle, StatusHandle) {
    let service = StatusService::new(verbose);
    let receiver = service.handle_for(
        InstanceId::new(ComponentKind::Receiver, "otlp", "otlp").with_pipelines(["traces"]),
    );
    let processor = service.handle_for(
        InstanceId::new(ComponentKind::Processor, "batch", "batch").with_pipelines(["traces"]),
    );
    service.ready();
    (service, receiver, processor)
}

async fn get(router: Router, path: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(
            Request::builder()
                .uri(path)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

#[tokio::test]
async fn healthy_service_returns_200_with_full_tree() {
    let (service, receiver, processor) = traces_service(true);
    for handle in [&receiver, &processor] {
        handle.report(StatusEvent::starting()).expect("starting");
        handle.report(StatusEvent::ok()).expect("ok");
    }

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (code, body) = get(router, "/").await;

    assert_eq!(code, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["start_time"].is_string());
    assert!(body["status_time"].is_string());
    assert!(body.get("error").is_none());

    let traces = &body["components"]["pipeline:traces"];
    assert_eq!(traces["status"], "OK");
    assert_eq!(traces["components"]["receiver:otlp"]["status"], "OK");
    assert_eq!(traces["components"]["processor:batch"]["status"], "OK");
}

#[tokio::test]
async fn recoverable_error_returns_503_with_message() {
    let (service, receiver, _processor) = traces_service(true);
    receiver.report(StatusEvent::starting()).expect("starting");
    receiver
        .report(StatusEvent::recoverable_error("conn reset"))
        .expect("recoverable");

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (code, body) = get(router, "/").await;

    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "RecoverableError");
    assert_eq!(body["error"], "conn reset");
}

#[tokio::test]
async fn permanent_error_returns_400() {
    let (service, receiver, _processor) = traces_service(true);
    receiver.report(StatusEvent::starting()).expect("starting");
    receiver
        .report(StatusEvent::permanent_error("bad config"))
        .expect("permanent");

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (code, body) = get(router, "/").await;
    assert_eq!(code, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "PermanentError");
}

#[tokio::test]
async fn fatal_error_returns_500() {
    let (service, receiver, _processor) = traces_service(true);
    receiver.report(StatusEvent::starting()).expect("starting");
    receiver
        .report(StatusEvent::fatal_error("oom"))
        .expect("fatal");

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (code, body) = get(router, "/").await;
    assert_eq!(code, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["status"], "FatalError");
}

#[tokio::test]
async fn fresh_service_returns_503_with_unstarted_components() {
    let (service, _receiver, _processor) = traces_service(true);

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (code, body) = get(router, "/").await;

    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "None");
    // Registered components appear with status None until they report.
    let traces = &body["components"]["pipeline:traces"];
    assert_eq!(traces["status"], "None");
    assert_eq!(traces["components"]["receiver:otlp"]["status"], "None");
}

#[tokio::test]
async fn summary_mode_omits_the_component_tree() {
    let (service, receiver, _processor) = traces_service(false);
    receiver.report(StatusEvent::starting()).expect("starting");
    receiver.report(StatusEvent::ok()).expect("ok");

    let router = pulse_healthcheck::router("/", service.aggregator());
    let (_, body) = get(router, "/").await;
    assert!(body.get("components").is_none());
}

#[tokio::test]
async fn handler_serves_only_the_configured_path() {
    let (service, _receiver, _processor) = traces_service(true);

    let router = pulse_healthcheck::router("/healthz", service.aggregator());
    let (code, _) = get(router.clone(), "/healthz").await;
    assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);

    let (code, _) = get(router, "/").await;
    assert_eq!(code, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn extension_reports_ok_once_bound_then_shuts_down() {
    let service = StatusService::new(true);
    let handle = service.handle_for(HealthCheckExtension::instance_id());
    service.ready();
    handle.report(StatusEvent::starting()).expect("starting");

    let settings = HealthCheckSettings {
        endpoint: "127.0.0.1:0".to_owned(),
        ..Default::default()
    };
    let extension = HealthCheckExtension::new(settings, handle);
    let task = extension
        .start(service.aggregator())
        .await
        .expect("bind succeeds");

    // OK was reported synchronously, once the listener was in hand.
    assert_eq!(
        service
            .aggregator()
            .pipeline_status(&AggregationKey::Extensions),
        Some(Status::Ok)
    );

    extension.shutdown();
    task.await.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn extension_reports_fatal_on_invalid_endpoint() {
    let service = StatusService::new(true);
    let fatal_rx = service.fatal_errors();
    let handle = service.handle_for(HealthCheckExtension::instance_id());
    service.ready();
    handle.report(StatusEvent::starting()).expect("starting");

    let settings = HealthCheckSettings {
        endpoint: "not-a-socket-address".to_owned(),
        ..Default::default()
    };
    let extension = HealthCheckExtension::new(settings, handle);
    let err = extension
        .start(service.aggregator())
        .await
        .expect_err("bind must fail");
    assert!(matches!(
        err,
        pulse_healthcheck::error::Error::InvalidEndpoint { .. }
    ));

    // The fatal signal was already delivered when start() returned, and the
    // extension ended up in FatalError.
    let signal = fatal_rx.try_recv().expect("fatal signal");
    assert_eq!(signal.source.component_id(), "healthcheck");
    assert_eq!(
        service
            .aggregator()
            .pipeline_status(&AggregationKey::Extensions),
        Some(Status::FatalError)
    );
}

#[tokio::test]
async fn extension_never_passes_through_ok_when_bind_fails() {
    // Record the full status progression through a bare reporter, so an OK
    // reported before the bind has succeeded would show up in the sequence.
    let aggregator = Arc::new(Aggregator::new(true));
    let sink_aggregator = Arc::clone(&aggregator);
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink_seen = Arc::clone(&seen);
    let reporter = Arc::new(Reporter::new(move |key, id, event| {
        sink_aggregator.status_changed(key, id, event);
        sink_seen.lock().expect("sink lock").push(event.status());
    }));
    let key = reporter.register(HealthCheckExtension::instance_id());
    let handle = StatusHandle::new(Arc::clone(&reporter), key);
    reporter.ready();
    handle.report(StatusEvent::starting()).expect("starting");

    let settings = HealthCheckSettings {
        endpoint: "not-a-socket-address".to_owned(),
        ..Default::default()
    };
    let extension = HealthCheckExtension::new(settings, handle);
    let _err = extension
        .start(Arc::clone(&aggregator))
        .await
        .expect_err("bind must fail");

    assert_eq!(
        *seen.lock().expect("lock"),
        vec![Status::None, Status::Starting, Status::FatalError]
    );
}

#[tokio::test]
async fn run_serves_until_cancelled() {
    let (service, _receiver, _processor) = traces_service(true);
    let settings = HealthCheckSettings {
        endpoint: "127.0.0.1:0".to_owned(),
        ..Default::default()
    };

    // A pre-cancelled token makes the server shut down right after startup.
    let cancel = CancellationToken::new();
    cancel.cancel();
    pulse_healthcheck::run(settings, service.aggregator(), cancel)
        .await
        .expect("clean run");
}
