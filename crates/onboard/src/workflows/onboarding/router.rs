use std::sync::Arc;

use axum::{
    async_trait,
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, Request, State,
    },
    http::{request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::approval::{ApprovalFilter, ApprovalId, ApprovalStatus};
use super::domain::{CompanyId, CompanyProfileRequest, ContactInfoRequest, OperationalInfoRequest};
use super::error::OnboardingError;
use super::repository::{ApprovalRepository, CompanyRepository, RepositoryError};
use super::service::OnboardingService;

/// Header naming the person behind a submission or decision.
pub const ACTOR_HEADER: &str = "x-actor";

/// HTTP surface of the onboarding workflow.
pub fn onboarding_router<C, A>(service: Arc<OnboardingService<C, A>>) -> Router
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    Router::new()
        .route("/companies/profile", post(create_profile_handler::<C, A>))
        .route("/companies/:company_id", get(company_handler::<C, A>))
        .route(
            "/companies/:company_id/contact",
            put(contact_handler::<C, A>),
        )
        .route(
            "/companies/:company_id/operations",
            put(operations_handler::<C, A>),
        )
        .route(
            "/companies/:company_id/complete",
            post(complete_handler::<C, A>),
        )
        .route("/companies/approvals", get(list_approvals_handler::<C, A>))
        .route(
            "/companies/approvals/:approval_id",
            get(approval_handler::<C, A>),
        )
        .route(
            "/companies/approvals/:approval_id/restore",
            post(restore_handler::<C, A>),
        )
        .route(
            "/companies/approvals/:approval_id/approve",
            post(approve_handler::<C, A>),
        )
        .route(
            "/companies/approvals/:approval_id/reject",
            post(reject_handler::<C, A>),
        )
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RejectParams {
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApprovalQuery {
    #[serde(rename = "type")]
    data_type: Option<String>,
    status: Option<String>,
}

pub(crate) async fn create_profile_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<CompanyProfileRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.create_profile(request, actor(&headers)) {
        Ok(approval_id) => staged(StatusCode::CREATED, approval_id),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn contact_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(company_id): PathParam<CompanyId>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<ContactInfoRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.update_contact(company_id, request, actor(&headers)) {
        Ok(approval_id) => staged(StatusCode::OK, approval_id),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn operations_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(company_id): PathParam<CompanyId>,
    headers: HeaderMap,
    JsonBody(request): JsonBody<OperationalInfoRequest>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.update_operations(company_id, request, actor(&headers)) {
        Ok(approval_id) => staged(StatusCode::OK, approval_id),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn complete_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(company_id): PathParam<CompanyId>,
    headers: HeaderMap,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.complete(company_id, actor(&headers)) {
        Ok(approval_id) => staged(StatusCode::OK, approval_id),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn company_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(company_id): PathParam<CompanyId>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.company(company_id) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_approvals_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    QueryParams(query): QueryParams<ApprovalQuery>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    let Some(data_type) = query.data_type.filter(|value| !value.trim().is_empty()) else {
        return bad_request("query parameter 'type' is required".to_string());
    };
    let status = match query.status.as_deref().map(str::parse::<ApprovalStatus>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(message)) => return bad_request(message),
    };

    match service.approvals(&ApprovalFilter { data_type, status }) {
        Ok(approvals) => (StatusCode::OK, Json(approvals)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn approval_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(approval_id): PathParam<ApprovalId>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.approval(approval_id) {
        Ok(approval) => (StatusCode::OK, Json(approval)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn restore_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(approval_id): PathParam<ApprovalId>,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.restore(approval_id) {
        Ok(company) => (StatusCode::OK, Json(company)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn approve_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(approval_id): PathParam<ApprovalId>,
    headers: HeaderMap,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.approve(approval_id, actor(&headers)) {
        Ok(approval) => (StatusCode::OK, Json(approval)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn reject_handler<C, A>(
    State(service): State<Arc<OnboardingService<C, A>>>,
    PathParam(approval_id): PathParam<ApprovalId>,
    QueryParams(params): QueryParams<RejectParams>,
    headers: HeaderMap,
) -> Response
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    match service.reject(approval_id, params.reason.as_deref(), actor(&headers)) {
        Ok(approval) => (StatusCode::OK, Json(approval)).into_response(),
        Err(error) => error.into_response(),
    }
}

fn actor(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
}

fn staged(status: StatusCode, approval_id: ApprovalId) -> Response {
    (status, Json(json!({ "approvalId": approval_id }))).into_response()
}

fn bad_request(message: String) -> Response {
    error_body(StatusCode::BAD_REQUEST, message)
}

fn error_body(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// `Json` body whose rejection keeps axum's status but uses the `{"error"}` body.
pub(crate) struct JsonBody<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(request, state)
            .await
            .map(|Json(value)| Self(value))
            .map_err(|rejection| error_body(rejection.status(), rejection.body_text()))
    }
}

/// Path segment extractor, rejected the same way as [`JsonBody`].
pub(crate) struct PathParam<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequestParts<S> for PathParam<T>
where
    Path<T>: FromRequestParts<S, Rejection = PathRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Path::<T>::from_request_parts(parts, state)
            .await
            .map(|Path(value)| Self(value))
            .map_err(|rejection| error_body(rejection.status(), rejection.body_text()))
    }
}

pub(crate) struct QueryParams<T>(pub(crate) T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    Query<T>: FromRequestParts<S, Rejection = QueryRejection>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        Query::<T>::from_request_parts(parts, state)
            .await
            .map(|Query(value)| Self(value))
            .map_err(|rejection| error_body(rejection.status(), rejection.body_text()))
    }
}

impl OnboardingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::UnsupportedOperation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } | Self::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            Self::AlreadyDecided { .. }
            | Self::RegressingProgress { .. }
            | Self::Repository(RepositoryError::Conflict(_)) => StatusCode::CONFLICT,
            Self::Snapshot(_) | Self::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for OnboardingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let payload = match &self {
            Self::Validation(failed) => json!({
                "error": failed.to_string(),
                "errors": failed.errors,
            }),
            other => json!({ "error": other.to_string() }),
        };
        (status, Json(payload)).into_response()
    }
}
