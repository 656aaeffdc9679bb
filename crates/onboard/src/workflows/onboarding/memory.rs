//! Process-local stores used by the service binary, the demo, and tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use super::approval::{Approval, ApprovalFilter, ApprovalId, NewApproval};
use super::domain::{Company, CompanyId};
use super::repository::{ApprovalRepository, CompanyRepository, RepositoryError};

#[derive(Debug)]
struct Table<K, V> {
    last_id: u64,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

impl<K, V> Table<K, V> {
    fn next_id(&mut self) -> u64 {
        self.last_id += 1;
        self.last_id
    }
}

fn lock<K, V>(table: &Mutex<Table<K, V>>) -> Result<MutexGuard<'_, Table<K, V>>, RepositoryError> {
    table
        .lock()
        .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryCompanyRepository {
    table: Arc<Mutex<Table<CompanyId, Company>>>,
}

impl InMemoryCompanyRepository {
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(lock(&self.table)?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }
}

impl CompanyRepository for InMemoryCompanyRepository {
    fn insert(&self, company: Company) -> Result<Company, RepositoryError> {
        let mut table = lock(&self.table)?;
        let id = CompanyId(table.next_id());
        let stored = company.with_id(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, company: Company) -> Result<Company, RepositoryError> {
        let id = company.id.ok_or(RepositoryError::NotFound)?;
        let mut table = lock(&self.table)?;
        match table.rows.get_mut(&id) {
            Some(row) => {
                *row = company.clone();
                Ok(company)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, id: CompanyId) -> Result<Option<Company>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.get(&id).cloned())
    }
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryApprovalRepository {
    table: Arc<Mutex<Table<ApprovalId, Approval>>>,
}

impl ApprovalRepository for InMemoryApprovalRepository {
    fn insert(&self, approval: NewApproval) -> Result<Approval, RepositoryError> {
        let mut table = lock(&self.table)?;
        let id = ApprovalId(table.next_id());
        let stored = approval.into_approval(id);
        table.rows.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, approval: Approval) -> Result<Approval, RepositoryError> {
        let mut table = lock(&self.table)?;
        let row = table
            .rows
            .get_mut(&approval.id)
            .ok_or(RepositoryError::NotFound)?;
        if row.approval_status.is_terminal() {
            return Err(RepositoryError::Conflict(format!(
                "approval {} is already {}",
                row.id, row.approval_status
            )));
        }
        *row = approval.clone();
        Ok(approval)
    }

    fn fetch(&self, id: ApprovalId) -> Result<Option<Approval>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table.rows.get(&id).cloned())
    }

    fn list(&self, filter: &ApprovalFilter) -> Result<Vec<Approval>, RepositoryError> {
        let table = lock(&self.table)?;
        Ok(table
            .rows
            .values()
            .filter(|approval| filter.matches(approval))
            .cloned()
            .collect())
    }
}
