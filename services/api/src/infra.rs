use chrono::NaiveDate;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use onboard::config::WorkflowConfig;
use onboard::error::AppError;
use onboard::workflows::onboarding::{
    InMemoryApprovalRepository, InMemoryCompanyRepository, OnboardingService,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

impl AppState {
    /// State backed by a recorder that is not installed globally.
    pub(crate) fn detached(ready: bool) -> Self {
        let recorder = PrometheusBuilder::new().build_recorder();
        Self {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(recorder.handle()),
        }
    }
}

pub(crate) type MemoryOnboardingService =
    OnboardingService<InMemoryCompanyRepository, InMemoryApprovalRepository>;

/// Stores live for the lifetime of the process.
pub(crate) fn in_memory_service(
    workflow: &WorkflowConfig,
) -> Result<Arc<MemoryOnboardingService>, AppError> {
    let companies = Arc::new(InMemoryCompanyRepository::default());
    let approvals = Arc::new(InMemoryApprovalRepository::default());
    let service = OnboardingService::new(companies, approvals, workflow.clone())?;
    Ok(Arc::new(service))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
