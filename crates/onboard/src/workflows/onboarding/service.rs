use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use super::approval::{Approval, ApprovalFilter, ApprovalId, DataType};
use super::domain::{
    Company, CompanyId, CompanyProfileRequest, ContactInfoRequest, OnboardingRequest,
    OperationalInfoRequest,
};
use super::error::OnboardingError;
use super::orchestrator::OnboardingOrchestrator;
use super::processor::{
    ApprovalProcessor, CompanyApprovalProcessor, ProcessorRegistry, RegistryError,
};
use super::repository::{ApprovalRepository, CompanyRepository, RepositoryError};
use crate::config::WorkflowConfig;

/// Facade over the orchestrator, the processor registry, and both stores.
///
/// Approve and reject run one at a time: the pending check, the company write,
/// and the status write happen under `decisions`, so a second decision on the
/// same approval sees it terminal and a stale update sees the newer company.
pub struct OnboardingService<C, A> {
    companies: Arc<C>,
    approvals: Arc<A>,
    orchestrator: OnboardingOrchestrator<A>,
    registry: ProcessorRegistry,
    settings: WorkflowConfig,
    decisions: Mutex<()>,
}

impl<C, A> OnboardingService<C, A>
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    /// Wires the standard processors; fails if any data type is left unhandled.
    pub fn new(
        companies: Arc<C>,
        approvals: Arc<A>,
        settings: WorkflowConfig,
    ) -> Result<Self, RegistryError> {
        let company_processor: Arc<dyn ApprovalProcessor> = Arc::new(
            CompanyApprovalProcessor::new(companies.clone(), approvals.clone()),
        );
        let registry = ProcessorRegistry::new(vec![company_processor])?;
        Ok(Self::with_registry(companies, approvals, registry, settings))
    }

    pub fn with_registry(
        companies: Arc<C>,
        approvals: Arc<A>,
        registry: ProcessorRegistry,
        settings: WorkflowConfig,
    ) -> Self {
        let orchestrator = OnboardingOrchestrator::new(approvals.clone());
        Self {
            companies,
            approvals,
            orchestrator,
            registry,
            settings,
            decisions: Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &WorkflowConfig {
        &self.settings
    }

    pub fn supported_types(&self) -> Vec<DataType> {
        self.registry.supported_types()
    }

    pub fn create_profile(
        &self,
        request: CompanyProfileRequest,
        actor: Option<&str>,
    ) -> Result<ApprovalId, OnboardingError> {
        self.submit(OnboardingRequest::CreateCompany(request), None, actor)
    }

    pub fn update_contact(
        &self,
        company_id: CompanyId,
        request: ContactInfoRequest,
        actor: Option<&str>,
    ) -> Result<ApprovalId, OnboardingError> {
        self.submit(
            OnboardingRequest::UpdateContactInfo(request),
            Some(company_id),
            actor,
        )
    }

    pub fn update_operations(
        &self,
        company_id: CompanyId,
        request: OperationalInfoRequest,
        actor: Option<&str>,
    ) -> Result<ApprovalId, OnboardingError> {
        self.submit(
            OnboardingRequest::UpdateOperationalInfo(request),
            Some(company_id),
            actor,
        )
    }

    pub fn complete(
        &self,
        company_id: CompanyId,
        actor: Option<&str>,
    ) -> Result<ApprovalId, OnboardingError> {
        self.submit(OnboardingRequest::CompleteOnboarding, Some(company_id), actor)
    }

    /// Loads the target company (when one is named) and stages the change.
    pub fn submit(
        &self,
        request: OnboardingRequest,
        company_id: Option<CompanyId>,
        actor: Option<&str>,
    ) -> Result<ApprovalId, OnboardingError> {
        let company = match company_id {
            Some(id) => Some(self.company(id)?),
            None => None,
        };
        self.orchestrator
            .submit_event(&request, company.as_ref(), self.actor(actor))
    }

    /// Staged snapshot of an approval, read without writing anything.
    pub fn restore(&self, approval_id: ApprovalId) -> Result<Company, OnboardingError> {
        Ok(self.approval(approval_id)?.staged_company()?)
    }

    pub fn approve(
        &self,
        approval_id: ApprovalId,
        actor: Option<&str>,
    ) -> Result<Approval, OnboardingError> {
        let _decision = self.decision_lock()?;
        let (approval, processor) = self.pending_decision(approval_id)?;
        let approver = self.actor(actor);
        let decided = processor.approve(approval, approver)?;
        info!(%approval_id, status = %decided.approval_status, approver, "approval decided");
        Ok(decided)
    }

    /// Rejects a pending approval. A missing or blank reason is replaced by the
    /// configured placeholder.
    pub fn reject(
        &self,
        approval_id: ApprovalId,
        reason: Option<&str>,
        actor: Option<&str>,
    ) -> Result<Approval, OnboardingError> {
        let _decision = self.decision_lock()?;
        let (approval, processor) = self.pending_decision(approval_id)?;
        let approver = self.actor(actor);
        let reason = reason
            .map(str::trim)
            .filter(|reason| !reason.is_empty())
            .unwrap_or(&self.settings.default_rejection_reason);
        let decided = processor.reject(approval, approver, reason)?;
        info!(%approval_id, status = %decided.approval_status, approver, "approval decided");
        Ok(decided)
    }

    pub fn approval(&self, approval_id: ApprovalId) -> Result<Approval, OnboardingError> {
        self.approvals
            .fetch(approval_id)?
            .ok_or_else(|| OnboardingError::approval_not_found(approval_id))
    }

    pub fn approvals(&self, filter: &ApprovalFilter) -> Result<Vec<Approval>, OnboardingError> {
        Ok(self.approvals.list(filter)?)
    }

    pub fn company(&self, company_id: CompanyId) -> Result<Company, OnboardingError> {
        self.companies
            .fetch(company_id)?
            .ok_or_else(|| OnboardingError::company_not_found(company_id))
    }

    fn decision_lock(&self) -> Result<MutexGuard<'_, ()>, OnboardingError> {
        self.decisions.lock().map_err(|_| {
            OnboardingError::from(RepositoryError::Unavailable(
                "decision lock poisoned".to_string(),
            ))
        })
    }

    /// Must be called with the decision lock held.
    fn pending_decision(
        &self,
        approval_id: ApprovalId,
    ) -> Result<(Approval, &dyn ApprovalProcessor), OnboardingError> {
        let approval = self.approval(approval_id)?;
        let processor = self.registry.find(&approval.data_type)?;

        if approval.approval_status.is_terminal() {
            warn!(%approval_id, status = %approval.approval_status, "refusing to re-decide approval");
            return Err(OnboardingError::AlreadyDecided {
                id: approval_id,
                status: approval.approval_status,
            });
        }

        Ok((approval, processor))
    }

    fn actor<'a>(&'a self, actor: Option<&'a str>) -> &'a str {
        actor
            .map(str::trim)
            .filter(|actor| !actor.is_empty())
            .unwrap_or(&self.settings.system_actor)
    }
}
