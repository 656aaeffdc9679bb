use std::fmt;

use super::approval::{ApprovalId, ApprovalStatus, SnapshotError};
use super::domain::{CompanyId, ProgressState};
use super::repository::RepositoryError;
use super::validation::ValidationResult;

/// Every business-rule violation found for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailed {
    pub errors: Vec<String>,
}

impl ValidationFailed {
    pub fn single(error: impl Into<String>) -> Self {
        Self {
            errors: vec![error.into()],
        }
    }
}

impl From<ValidationResult> for ValidationFailed {
    fn from(result: ValidationResult) -> Self {
        Self {
            errors: result.into_errors(),
        }
    }
}

impl fmt::Display for ValidationFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed: {}", self.errors.join("; "))
    }
}

impl std::error::Error for ValidationFailed {}

/// Which kind of record a lookup missed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Company,
    Approval,
}

impl RecordKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Company => "company",
            Self::Approval => "approval",
        }
    }
}

/// Error raised by the onboarding workflow.
#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error(transparent)]
    Validation(#[from] ValidationFailed),
    #[error("{} {id} not found", .kind.label())]
    NotFound { kind: RecordKind, id: u64 },
    #[error("{0}")]
    UnsupportedOperation(String),
    #[error("approval {id} was already {status}")]
    AlreadyDecided {
        id: ApprovalId,
        status: ApprovalStatus,
    },
    #[error("approval {approval} would move company {company} back from {current} to {staged}")]
    RegressingProgress {
        approval: ApprovalId,
        company: CompanyId,
        current: ProgressState,
        staged: ProgressState,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl OnboardingError {
    pub fn company_not_found(id: CompanyId) -> Self {
        Self::NotFound {
            kind: RecordKind::Company,
            id: id.0,
        }
    }

    pub fn approval_not_found(id: ApprovalId) -> Self {
        Self::NotFound {
            kind: RecordKind::Approval,
            id: id.0,
        }
    }
}
