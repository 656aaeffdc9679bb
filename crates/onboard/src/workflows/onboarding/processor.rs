use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::approval::{Approval, DataType, OperationType};
use super::domain::Company;
use super::error::OnboardingError;
use super::repository::{ApprovalRepository, CompanyRepository, RepositoryError};

/// Applies or discards staged changes of one data type.
///
/// Processors take no locks of their own; callers run one decision at a time.
pub trait ApprovalProcessor: Send + Sync {
    fn data_type(&self) -> DataType;

    /// Commits the staged snapshot and marks the approval `APPROVED`.
    fn approve(&self, approval: Approval, approver: &str) -> Result<Approval, OnboardingError>;

    /// Marks the approval `REJECTED` with `reason`; nothing else is written.
    fn reject(
        &self,
        approval: Approval,
        approver: &str,
        reason: &str,
    ) -> Result<Approval, OnboardingError>;
}

/// Processor for approvals tagged `COMPANY`.
pub struct CompanyApprovalProcessor<C, A> {
    companies: Arc<C>,
    approvals: Arc<A>,
}

impl<C, A> CompanyApprovalProcessor<C, A>
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    pub fn new(companies: Arc<C>, approvals: Arc<A>) -> Self {
        Self {
            companies,
            approvals,
        }
    }

    fn create(&self, approval: Approval, snapshot: Company) -> Result<Approval, OnboardingError> {
        let created = self.companies.insert(Company {
            id: None,
            ..snapshot
        })?;
        let company_id = created.id.ok_or_else(|| {
            RepositoryError::Unavailable("company store returned a row without identity".into())
        })?;
        info!(approval_id = %approval.id, %company_id, "created company from approval");
        Ok(approval.with_data_id(company_id))
    }

    fn overwrite(&self, approval: Approval, snapshot: Company) -> Result<Approval, OnboardingError> {
        let company_id = approval.data_id.ok_or_else(|| {
            OnboardingError::UnsupportedOperation(format!(
                "update approval {} does not name a target company",
                approval.id
            ))
        })?;

        let current = self
            .companies
            .fetch(company_id)?
            .ok_or_else(|| OnboardingError::company_not_found(company_id))?;

        if current.progress_state > snapshot.progress_state {
            return Err(OnboardingError::RegressingProgress {
                approval: approval.id,
                company: company_id,
                current: current.progress_state,
                staged: snapshot.progress_state,
            });
        }

        self.companies.update(snapshot.with_id(company_id))?;
        info!(approval_id = %approval.id, %company_id, "updated company from approval");
        Ok(approval)
    }
}

impl<C, A> ApprovalProcessor for CompanyApprovalProcessor<C, A>
where
    C: CompanyRepository + 'static,
    A: ApprovalRepository + 'static,
{
    fn data_type(&self) -> DataType {
        DataType::Company
    }

    fn approve(&self, approval: Approval, approver: &str) -> Result<Approval, OnboardingError> {
        let snapshot = approval.staged_company()?;

        let operation_type = approval.operation_type;
        let approval = match operation_type {
            OperationType::New => self.create(approval, snapshot)?,
            OperationType::Update => self.overwrite(approval, snapshot)?,
        };

        let approval_id = approval.id;
        let company_id = approval.data_id;
        // The company write above is not rolled back if this one fails.
        self.approvals
            .update(approval.approved(approver, Utc::now()))
            .map_err(|err| {
                error!(
                    %approval_id,
                    ?company_id,
                    error = %err,
                    "company written but approval status update failed"
                );
                OnboardingError::from(err)
            })
    }

    fn reject(
        &self,
        approval: Approval,
        approver: &str,
        reason: &str,
    ) -> Result<Approval, OnboardingError> {
        info!(approval_id = %approval.id, reason, "rejecting company approval");
        Ok(self
            .approvals
            .update(approval.rejected(approver, Utc::now(), reason))?)
    }
}

/// Startup-time registration failures.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("no approval processor registered for {0}")]
    MissingProcessor(DataType),
    #[error("more than one approval processor registered for {0}")]
    DuplicateProcessor(DataType),
}

/// Exactly one processor per [`DataType`], checked when the registry is built.
#[derive(Clone)]
pub struct ProcessorRegistry {
    processors: BTreeMap<DataType, Arc<dyn ApprovalProcessor>>,
}

impl ProcessorRegistry {
    pub fn new(processors: Vec<Arc<dyn ApprovalProcessor>>) -> Result<Self, RegistryError> {
        let mut registered = BTreeMap::new();
        for processor in processors {
            let data_type = processor.data_type();
            if registered.insert(data_type, processor).is_some() {
                return Err(RegistryError::DuplicateProcessor(data_type));
            }
        }

        if let Some(missing) = DataType::ALL
            .into_iter()
            .find(|data_type| !registered.contains_key(data_type))
        {
            return Err(RegistryError::MissingProcessor(missing));
        }

        Ok(Self {
            processors: registered,
        })
    }

    /// Resolves the free-form type tag stored on an approval.
    pub fn find(&self, tag: &str) -> Result<&dyn ApprovalProcessor, OnboardingError> {
        let processor = tag
            .parse::<DataType>()
            .ok()
            .and_then(|data_type| self.processors.get(&data_type));

        match processor {
            Some(processor) => {
                debug!(tag, "resolved approval processor");
                Ok(processor.as_ref())
            }
            None => {
                warn!(tag, "no approval processor registered");
                Err(OnboardingError::UnsupportedOperation(format!(
                    "No processor registered for approval type: {tag}"
                )))
            }
        }
    }

    pub fn supported_types(&self) -> Vec<DataType> {
        self.processors.keys().copied().collect()
    }
}
