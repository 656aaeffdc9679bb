use std::sync::Arc;
use std::thread;
use std::time::Duration;

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::config::WorkflowConfig;
use crate::workflows::onboarding::approval::{Approval, ApprovalFilter, ApprovalId, NewApproval};
use crate::workflows::onboarding::domain::{
    Company, CompanyId, CompanyProfileRequest, ContactInfoRequest, OperationalInfoRequest,
    ProgressState,
};
use crate::workflows::onboarding::memory::{InMemoryApprovalRepository, InMemoryCompanyRepository};
use crate::workflows::onboarding::repository::{
    ApprovalRepository, CompanyRepository, RepositoryError,
};
use crate::workflows::onboarding::service::OnboardingService;

pub(super) type MemoryService = OnboardingService<InMemoryCompanyRepository, InMemoryApprovalRepository>;

pub(super) fn workflow_config() -> WorkflowConfig {
    WorkflowConfig {
        system_actor: "system".to_string(),
        default_rejection_reason: "No reason provided".to_string(),
    }
}

pub(super) fn build_service() -> (
    MemoryService,
    Arc<InMemoryCompanyRepository>,
    Arc<InMemoryApprovalRepository>,
) {
    let companies = Arc::new(InMemoryCompanyRepository::default());
    let approvals = Arc::new(InMemoryApprovalRepository::default());
    let service = OnboardingService::new(companies.clone(), approvals.clone(), workflow_config())
        .expect("company processor registers");
    (service, companies, approvals)
}

pub(super) fn onboarding_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 1).expect("valid date")
}

pub(super) fn profile_request() -> CompanyProfileRequest {
    CompanyProfileRequest {
        name: Some("Acme".to_string()),
        registration_number: Some("RN1".to_string()),
        entity_type: Some("LLC".to_string()),
        country: Some("SG".to_string()),
        industry_sector: Some("Logistics".to_string()),
        ..CompanyProfileRequest::default()
    }
}

pub(super) fn contact_request() -> ContactInfoRequest {
    ContactInfoRequest {
        main_contact_name: Some("Jane Tan".to_string()),
        main_contact_email: Some("jane@acme.sg".to_string()),
        main_contact_phone: Some("+65 6000 0000".to_string()),
        contact_person_role: Some("Director".to_string()),
        billing_contact_email: Some("billing@acme.sg".to_string()),
        ..ContactInfoRequest::default()
    }
}

pub(super) fn operations_request() -> OperationalInfoRequest {
    OperationalInfoRequest {
        tax_id_number: Some("T-100".to_string()),
        bank_name: Some("DBS".to_string()),
        bank_account_number: Some("001-234".to_string()),
        preferred_payment_method: Some("BANK_TRANSFER".to_string()),
        role_on_platform: Some("SUPPLIER".to_string()),
        operating_hours: Some("09:00-18:00".to_string()),
        has_compliance_certification: Some(true),
        agreed_to_terms_of_service: Some(true),
        agreed_onboarding_date: Some(onboarding_date()),
        ..OperationalInfoRequest::default()
    }
}

/// Writes a company straight into the store, bypassing approval.
pub(super) fn seed_company(store: &InMemoryCompanyRepository, state: ProgressState) -> Company {
    let mut company = Company::from_profile(&profile_request());
    if state >= ProgressState::Contact {
        company = company.with_contact(&contact_request());
    }
    if state >= ProgressState::Operations {
        company = company.with_operations(&operations_request());
    }
    company.progress_state = state;
    store.insert(company).expect("seed company")
}

pub(super) fn seeded_id(company: &Company) -> CompanyId {
    company.id.expect("seeded company has an id")
}

/// Creates and approves a profile, returning the new company id.
pub(super) fn approved_company(service: &MemoryService) -> CompanyId {
    let approval_id = service
        .create_profile(profile_request(), None)
        .expect("profile staged");
    service
        .approve(approval_id, None)
        .expect("profile approved")
        .data_id
        .expect("approval carries company id")
}

pub(super) struct UnavailableCompanies;

impl CompanyRepository for UnavailableCompanies {
    fn insert(&self, _company: Company) -> Result<Company, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _company: Company) -> Result<Company, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Holds every company write long enough for concurrent decisions to overlap.
#[derive(Default)]
pub(super) struct SlowCompanies {
    pub(super) inner: InMemoryCompanyRepository,
}

impl SlowCompanies {
    const WRITE_DELAY: Duration = Duration::from_millis(50);
}

impl CompanyRepository for SlowCompanies {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError> {
        thread::sleep(Self::WRITE_DELAY);
        self.inner.insert(company)
    }

    fn update(&self, company: Company) -> Result<Company, RepositoryError> {
        thread::sleep(Self::WRITE_DELAY);
        self.inner.update(company)
    }

    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        self.inner.fetch(id)
    }
}

/// Stores approvals normally but refuses every status change.
#[derive(Default)]
pub(super) struct ReadOnlyApprovals {
    pub(super) inner: InMemoryApprovalRepository,
}

impl ApprovalRepository for ReadOnlyApprovals {
    fn insert(&self, approval: NewApproval) -> Result<Approval, RepositoryError> {
        self.inner.insert(approval)
    }

    fn update(&self, _approval: Approval) -> Result<Approval, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, id: ApprovalId) -> Result<Option<Approval>, RepositoryError> {
        self.inner.fetch(id)
    }

    fn list(&self, filter: &ApprovalFilter) -> Result<Vec<Approval>, RepositoryError> {
        self.inner.list(filter)
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
