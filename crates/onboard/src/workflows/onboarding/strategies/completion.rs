use super::{
    existing, require_state, OnboardingStrategy, ValidationFailed, ValidationResult, COMPANY_MISSING,
};
use crate::workflows::onboarding::domain::{Company, OnboardingEvent, ProgressState};

/// Final step: closes onboarding once operational details are on file.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompleteOnboardingStrategy;

impl OnboardingStrategy for CompleteOnboardingStrategy {
    type Request = ();

    const EVENT: OnboardingEvent = OnboardingEvent::CompleteOnboarding;

    fn validate(&self, _request: &(), company: Option<&Company>) -> ValidationResult {
        let Some(company) = company else {
            return ValidationResult::failure(COMPANY_MISSING);
        };

        let mut result = ValidationResult::success();

        require_state(
            &mut result,
            company,
            &[ProgressState::Operations],
            "Cannot complete onboarding",
        );

        if company.agreed_to_terms_of_service != Some(true) {
            result.add_error("Terms of service must be accepted before completing onboarding");
        }
        result.require_flag(
            company.has_compliance_certification,
            "Compliance certification status is required",
        );

        result
    }

    fn on_success(
        &self,
        _request: &(),
        company: Option<&Company>,
    ) -> Result<Company, ValidationFailed> {
        Ok(existing(company)?.completed())
    }
}
