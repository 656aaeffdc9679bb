use super::approval::{Approval, ApprovalFilter, ApprovalId, NewApproval};
use super::domain::{Company, CompanyId};

/// Canonical company rows. Only approval processors write here.
pub trait CompanyRepository: Send + Sync {
    /// Persists a company without identity and returns it with the assigned id.
    fn insert(&self, company: Company) -> Result<Company, RepositoryError>;
    /// Overwrites every field of an existing row.
    fn update(&self, company: Company) -> Result<Company, RepositoryError>;
    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError>;
}

/// Append-mostly store of staged changes.
pub trait ApprovalRepository: Send + Sync {
    fn insert(&self, approval: NewApproval) -> Result<Approval, RepositoryError>;
    /// Replaces a stored approval. Implementations refuse to overwrite one
    /// that is already approved or rejected.
    fn update(&self, approval: Approval) -> Result<Approval, RepositoryError>;
    fn fetch(&self, id: ApprovalId) -> Result<Option<Approval>, RepositoryError>;
    fn list(&self, filter: &ApprovalFilter) -> Result<Vec<Approval>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("write conflict: {0}")]
    Conflict(String),
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
