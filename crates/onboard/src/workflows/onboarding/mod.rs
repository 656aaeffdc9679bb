//! Company onboarding workflow: PROFILE → CONTACT → OPERATIONS → COMPLETED.
//!
//! Submissions go through a strategy (validate, then derive the target
//! company), get staged as an [`Approval`] by the orchestrator, and only reach
//! the company store when an [`ApprovalProcessor`] applies them.

pub mod approval;
pub mod domain;
pub mod error;
pub mod memory;
pub mod orchestrator;
pub mod processor;
pub mod repository;
pub mod router;
pub mod service;
pub mod strategies;
pub mod validation;

#[cfg(test)]
mod tests;

pub use approval::{
    Approval, ApprovalFilter, ApprovalId, ApprovalStatus, DataType, NewApproval, OperationType,
    SnapshotError,
};
pub use domain::{
    Company, CompanyId, CompanyProfileRequest, ContactInfoRequest, OnboardingEvent,
    OnboardingRequest, OperationalInfoRequest, ProgressState,
};
pub use error::{OnboardingError, RecordKind, ValidationFailed};
pub use memory::{InMemoryApprovalRepository, InMemoryCompanyRepository};
pub use orchestrator::OnboardingOrchestrator;
pub use processor::{ApprovalProcessor, CompanyApprovalProcessor, ProcessorRegistry, RegistryError};
pub use repository::{ApprovalRepository, CompanyRepository, RepositoryError};
pub use router::{onboarding_router, ACTOR_HEADER};
pub use service::OnboardingService;
pub use validation::ValidationResult;
