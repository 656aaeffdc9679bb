use super::{
    existing, require_state, OnboardingStrategy, ValidationFailed, ValidationResult, COMPANY_MISSING,
};
use crate::workflows::onboarding::domain::{
    Company, OnboardingEvent, OperationalInfoRequest, ProgressState,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateOperationalInfoStrategy;

impl OnboardingStrategy for UpdateOperationalInfoStrategy {
    type Request = OperationalInfoRequest;

    const EVENT: OnboardingEvent = OnboardingEvent::UpdateOperationalInfo;

    fn validate(&self, request: &Self::Request, company: Option<&Company>) -> ValidationResult {
        let Some(company) = company else {
            return ValidationResult::failure(COMPANY_MISSING);
        };

        let mut result = ValidationResult::success();

        require_state(
            &mut result,
            company,
            &[ProgressState::Contact, ProgressState::Operations],
            "Cannot update operational info",
        );

        result.require(request.tax_id_number.as_deref(), "Tax ID number is required");
        result.require(request.bank_name.as_deref(), "Bank name is required");
        result.require(
            request.bank_account_number.as_deref(),
            "Bank account number is required",
        );
        result.require(
            request.preferred_payment_method.as_deref(),
            "Preferred payment method is required",
        );
        result.require(
            request.role_on_platform.as_deref(),
            "Role on platform is required",
        );
        result.require(
            request.operating_hours.as_deref(),
            "Operating hours are required",
        );

        result.require_flag(
            request.has_compliance_certification,
            "Compliance certification status is required",
        );
        result.require_flag(
            request.agreed_to_terms_of_service,
            "Terms of service agreement is required",
        );

        if request.agreed_to_terms_of_service == Some(true)
            && request.agreed_onboarding_date.is_none()
        {
            result.add_error(
                "Agreed onboarding date is required when terms of service are accepted",
            );
        }

        result
    }

    fn on_success(
        &self,
        request: &Self::Request,
        company: Option<&Company>,
    ) -> Result<Company, ValidationFailed> {
        Ok(existing(company)?.with_operations(request))
    }
}
