use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::workflows::onboarding::domain::{CompanyId, ProgressState};
use crate::workflows::onboarding::memory::{InMemoryApprovalRepository, InMemoryCompanyRepository};
use crate::workflows::onboarding::repository::CompanyRepository;
use crate::workflows::onboarding::router::PathParam;
use crate::workflows::onboarding::{onboarding_router, OnboardingService};

fn json_request(method: &str, uri: &str, payload: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request builds")
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

fn acme_profile() -> Value {
    json!({
        "name": "Acme",
        "registrationNumber": "RN1",
        "entityType": "LLC",
        "country": "SG"
    })
}

#[tokio::test]
async fn create_profile_returns_created_with_approval_id() {
    let (service, _, _) = build_service();
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(json_request("POST", "/companies/profile", acme_profile()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["approvalId"], json!(1));
}

#[tokio::test]
async fn create_profile_returns_every_violation() {
    let (service, _, _) = build_service();
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "POST",
            "/companies/profile",
            json!({ "name": "Acme" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["errors"],
        json!([
            "Registration number is required",
            "Entity type is required",
            "Country is required"
        ])
    );
    assert_eq!(
        body["error"],
        json!("Validation failed: Registration number is required; Entity type is required; Country is required")
    );
}

#[tokio::test]
async fn contact_for_unknown_company_is_not_found() {
    let (service, _, _) = build_service();
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "PUT",
            "/companies/99/contact",
            json!({ "mainContactName": "Jane" }),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn contact_in_operations_state_is_bad_request() {
    let (service, companies, _) = build_service();
    let company = seed_company(&companies, ProgressState::Operations);
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            "PUT",
            &format!("/companies/{}/contact", seeded_id(&company)),
            serde_json::to_value(contact_request()).expect("serializes"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(
        body["errors"],
        json!(["Cannot update contact info in current state: OPERATIONS"])
    );
}

#[tokio::test]
async fn approve_route_creates_company_with_actor() {
    let (service, companies, _) = build_service();
    let approval_id = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    let router = onboarding_router(Arc::new(service));

    let request = Request::builder()
        .method("POST")
        .uri(format!("/companies/approvals/{approval_id}/approve"))
        .header("x-actor", "checker@acme.sg")
        .body(Body::empty())
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["approvalStatus"], json!("APPROVED"));
    assert_eq!(body["approvedBy"], json!("checker@acme.sg"));
    assert_eq!(body["dataId"], json!(1));
    assert_eq!(companies.len().expect("count rows"), 1);
}

#[tokio::test]
async fn second_decision_conflicts() {
    let (service, _, _) = build_service();
    let approval_id = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    service.approve(approval_id, None).expect("approved");
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(empty_request(
            "POST",
            &format!("/companies/approvals/{approval_id}/reject"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn reject_route_stores_reason() {
    let (service, _, _) = build_service();
    let approval_id = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(empty_request(
            "POST",
            &format!("/companies/approvals/{approval_id}/reject?reason=Missing%20documents"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["approvalStatus"], json!("REJECTED"));
    assert_eq!(body["remarks"], json!("Missing documents"));
}

#[tokio::test]
async fn unknown_approval_routes_are_not_found() {
    let (service, _, _) = build_service();
    let router = onboarding_router(Arc::new(service));

    for (method, uri) in [
        ("POST", "/companies/approvals/5/restore"),
        ("POST", "/companies/approvals/5/approve"),
        ("POST", "/companies/approvals/5/reject"),
        ("GET", "/companies/approvals/5"),
    ] {
        let response = router
            .clone()
            .oneshot(empty_request(method, uri))
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn list_approvals_filters_by_type_and_status() {
    let (service, _, _) = build_service();
    let first = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    service.approve(first, None).expect("approved");
    let router = onboarding_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/companies/approvals?type=COMPANY"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    let response = router
        .clone()
        .oneshot(empty_request(
            "GET",
            "/companies/approvals?type=COMPANY&status=pending",
        ))
        .await
        .expect("router responds");
    let body = read_json_body(response).await;
    assert_eq!(body[0]["id"], json!(2));
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let response = router
        .clone()
        .oneshot(empty_request("GET", "/companies/approvals"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .oneshot(empty_request(
            "GET",
            "/companies/approvals?type=COMPANY&status=DRAFT",
        ))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn restore_route_returns_snapshot() {
    let (service, _, _) = build_service();
    let approval_id = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(empty_request(
            "POST",
            &format!("/companies/approvals/{approval_id}/restore"),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["name"], json!("Acme"));
    assert_eq!(body["progressState"], json!("PROFILE"));
}

#[tokio::test]
async fn company_handler_returns_stored_company() {
    let (service, companies, _) = build_service();
    let company = seed_company(&companies, ProgressState::Contact);
    let service = Arc::new(service);

    let response = crate::workflows::onboarding::router::company_handler::<
        InMemoryCompanyRepository,
        InMemoryApprovalRepository,
    >(State(service.clone()), PathParam(seeded_id(&company)))
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["progressState"], json!("CONTACT"));
    assert_eq!(body["mainContactName"], json!("Jane Tan"));

    let response = crate::workflows::onboarding::router::company_handler::<
        InMemoryCompanyRepository,
        InMemoryApprovalRepository,
    >(State(service), PathParam(CompanyId(77)))
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repository_outage_is_internal_error() {
    let service = OnboardingService::new(
        Arc::new(UnavailableCompanies),
        Arc::new(ReadOnlyApprovals::default()),
        workflow_config(),
    )
    .expect("registry builds");
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(empty_request("POST", "/companies/3/complete"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], json!("repository unavailable: database offline"));
}

#[tokio::test]
async fn complete_route_stages_completion() {
    let (service, companies, _) = build_service();
    let company = seed_company(&companies, ProgressState::Operations);
    let router = onboarding_router(Arc::new(service));

    let response = router
        .oneshot(empty_request(
            "POST",
            &format!("/companies/{}/complete", seeded_id(&company)),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let stored = companies
        .fetch(seeded_id(&company))
        .expect("fetch")
        .expect("row");
    assert_eq!(stored.progress_state, ProgressState::Operations);
}

#[tokio::test]
async fn malformed_requests_get_json_error_bodies() {
    let (service, _, _) = build_service();
    let router = onboarding_router(Arc::new(service));

    let broken_json = Request::builder()
        .method("POST")
        .uri("/companies/profile")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .expect("request builds");
    let response = router
        .clone()
        .oneshot(broken_json)
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"].as_str().is_some_and(|message| !message.is_empty()));

    let wrong_type = json_request(
        "PUT",
        "/companies/1/contact",
        json!({ "mainContactName": 42 }),
    );
    let response = router
        .clone()
        .oneshot(wrong_type)
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(read_json_body(response).await["error"].is_string());

    let response = router
        .oneshot(empty_request("POST", "/companies/approvals/abc/approve"))
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json_body(response).await["error"].is_string());
}
