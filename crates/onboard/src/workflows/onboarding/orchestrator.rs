use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use super::approval::{
    change_summary, encode_snapshot, ApprovalId, DataType, NewApproval, OperationType,
};
use super::domain::{Company, OnboardingEvent, OnboardingRequest};
use super::error::{OnboardingError, ValidationFailed};
use super::repository::ApprovalRepository;
use super::strategies::{
    CompleteOnboardingStrategy, CreateCompanyStrategy, OnboardingStrategy,
    UpdateContactInfoStrategy, UpdateOperationalInfoStrategy,
};

/// Runs validate → transform → stage for one submission.
///
/// Holds no workflow state of its own: where a company stands is read from the
/// company passed in, so one instance can serve any number of callers.
pub struct OnboardingOrchestrator<A> {
    approvals: Arc<A>,
}

impl<A> Clone for OnboardingOrchestrator<A> {
    fn clone(&self) -> Self {
        Self {
            approvals: Arc::clone(&self.approvals),
        }
    }
}

impl<A> OnboardingOrchestrator<A>
where
    A: ApprovalRepository + 'static,
{
    pub fn new(approvals: Arc<A>) -> Self {
        Self { approvals }
    }

    /// Stages the change described by `request` as a pending approval.
    ///
    /// Writes exactly one approval on success and nothing on failure. The
    /// company store is never touched here.
    pub fn submit_event(
        &self,
        request: &OnboardingRequest,
        company: Option<&Company>,
        submitted_by: &str,
    ) -> Result<ApprovalId, OnboardingError> {
        match request {
            OnboardingRequest::CreateCompany(profile) => {
                self.run(&CreateCompanyStrategy, profile, company, submitted_by)
            }
            OnboardingRequest::UpdateContactInfo(contact) => {
                self.run(&UpdateContactInfoStrategy, contact, company, submitted_by)
            }
            OnboardingRequest::UpdateOperationalInfo(operations) => self.run(
                &UpdateOperationalInfoStrategy,
                operations,
                company,
                submitted_by,
            ),
            OnboardingRequest::CompleteOnboarding => {
                self.run(&CompleteOnboardingStrategy, &(), company, submitted_by)
            }
        }
    }

    fn run<S>(
        &self,
        strategy: &S,
        request: &S::Request,
        company: Option<&Company>,
        submitted_by: &str,
    ) -> Result<ApprovalId, OnboardingError>
    where
        S: OnboardingStrategy,
    {
        let validation = strategy.validate(request, company);
        if !validation.is_valid() {
            debug!(
                event = %S::EVENT,
                errors = %validation.error_message(),
                "onboarding submission rejected by validation"
            );
            return Err(ValidationFailed::from(validation).into());
        }

        let target = strategy.on_success(request, company)?;
        let draft = stage(S::EVENT, &target, company, submitted_by)?;
        let approval = self.approvals.insert(draft)?;

        info!(
            event = %S::EVENT,
            approval_id = %approval.id,
            company_id = ?approval.data_id,
            progress_state = %target.progress_state,
            "onboarding change staged for approval"
        );

        Ok(approval.id)
    }
}

fn operation_type(event: OnboardingEvent) -> OperationType {
    match event {
        OnboardingEvent::CreateCompany => OperationType::New,
        OnboardingEvent::UpdateContactInfo
        | OnboardingEvent::UpdateOperationalInfo
        | OnboardingEvent::CompleteOnboarding => OperationType::Update,
    }
}

fn stage(
    event: OnboardingEvent,
    target: &Company,
    current: Option<&Company>,
    submitted_by: &str,
) -> Result<NewApproval, OnboardingError> {
    let operation_type = operation_type(event);

    let (data_id, old_data) = match operation_type {
        OperationType::New => (None, None),
        OperationType::Update => {
            let current = current.ok_or_else(|| {
                ValidationFailed::single(super::strategies::COMPANY_MISSING)
            })?;
            let id = current.id.ok_or_else(|| {
                ValidationFailed::single("Company has not been approved yet and cannot be updated")
            })?;
            (Some(id), Some(encode_snapshot(current)?))
        }
    };

    let previous = match operation_type {
        OperationType::New => None,
        OperationType::Update => current,
    };

    Ok(NewApproval {
        data_type: DataType::Company,
        operation_type,
        data_id,
        submitted_by: submitted_by.to_string(),
        submitted_at: Utc::now(),
        new_data: encode_snapshot(target)?,
        old_data,
        change_summary: Some(change_summary(previous, target)?),
    })
}
