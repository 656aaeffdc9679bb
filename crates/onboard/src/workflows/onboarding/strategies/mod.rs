//! Per-step guard and transform rules.
//!
//! A strategy is a pair of pure functions over `(request, current company)`:
//! `validate` collects every rule violation, `on_success` derives the company
//! value the step would produce. Neither touches a store.

mod completion;
mod contact;
mod operations;
mod profile;

pub use completion::CompleteOnboardingStrategy;
pub use contact::UpdateContactInfoStrategy;
pub use operations::UpdateOperationalInfoStrategy;
pub use profile::CreateCompanyStrategy;

use super::domain::{Company, OnboardingEvent, ProgressState};
use super::error::ValidationFailed;
use super::validation::ValidationResult;

pub const COMPANY_MISSING: &str = "Company does not exist";

pub trait OnboardingStrategy {
    type Request;

    const EVENT: OnboardingEvent;

    fn validate(&self, request: &Self::Request, company: Option<&Company>) -> ValidationResult;

    fn on_success(
        &self,
        request: &Self::Request,
        company: Option<&Company>,
    ) -> Result<Company, ValidationFailed>;
}

fn existing(company: Option<&Company>) -> Result<&Company, ValidationFailed> {
    company.ok_or_else(|| ValidationFailed::single(COMPANY_MISSING))
}

/// Adds `"<action> in current state: <STATE>"` unless the company sits in one
/// of the `allowed` states.
fn require_state(
    result: &mut ValidationResult,
    company: &Company,
    allowed: &[ProgressState],
    action: &str,
) {
    if !allowed.contains(&company.progress_state) {
        result.add_error(format!(
            "{action} in current state: {}",
            company.progress_state
        ));
    }
}
