use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use grant_classifier::classification::ClassificationEngine;
use grant_classifier::grants::classification_router;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_classification_routes(engine: Arc<ClassificationEngine>) -> Router {
    let rules = Router::new()
        .route("/api/v1/rules", get(rules_endpoint))
        .with_state(engine.clone());

    classification_router(engine)
        .merge(rules)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Active rule set, for auditing which tables a deployment runs with.
pub(crate) async fn rules_endpoint(
    State(engine): State<Arc<ClassificationEngine>>,
) -> impl IntoResponse {
    Json(engine.rules().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    fn router() -> Router {
        let engine = ClassificationEngine::standard().expect("standard rules compile");
        with_classification_routes(Arc::new(engine))
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        let status = response.status();
        let body = to_bytes(response.into_body(), 4 * 1024 * 1024)
            .await
            .expect("body");
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, payload) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ok");
    }

    #[tokio::test]
    async fn rules_endpoint_exposes_the_active_tables() {
        let (status, payload) = get_json("/api/v1/rules").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["min_abstract_chars"], 50);
        assert_eq!(payload["categories"].as_array().map(Vec::len), Some(7));
    }

    #[tokio::test]
    async fn classification_routes_are_mounted() {
        let response = router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/organizations/classify")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"org_name": "Mayo Clinic"}"#))
                    .expect("request"),
            )
            .await
            .expect("router dispatch");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
