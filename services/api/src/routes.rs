use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use onboard::workflows::onboarding::{
    onboarding_router, ApprovalRepository, CompanyRepository, OnboardingService,
};
use serde_json::json;
use std::sync::Arc;

/// Workflow routes plus the operational endpoints. Expects an
/// `Extension<AppState>` layer on top.
pub(crate) fn with_onboarding_routes<C, A>(service: Arc<OnboardingService<C, A>>) -> axum::Router
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    onboarding_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::in_memory_service;
    use axum::body::Body;
    use axum::http::Request;
    use onboard::config::WorkflowConfig;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let service = in_memory_service(&WorkflowConfig::default()).expect("service builds");
        with_onboarding_routes(service).layer(Extension(AppState::detached(ready)))
    }

    async fn get(router: axum::Router, uri: &str) -> axum::response::Response {
        router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds")
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let response = get(app(false), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        assert_eq!(
            get(app(false), "/ready").await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(get(app(true), "/ready").await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = get(app(true), "/metrics").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/plain; version=0.0.4")
        );
    }

    #[tokio::test]
    async fn workflow_routes_are_mounted() {
        let response = get(app(true), "/companies/approvals?type=COMPANY").await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(app(true), "/companies/1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
