use super::{OnboardingStrategy, ValidationFailed, ValidationResult};
use crate::workflows::onboarding::domain::{Company, CompanyProfileRequest, OnboardingEvent};

/// First step: registration facts for a company that does not exist yet.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateCompanyStrategy;

impl OnboardingStrategy for CreateCompanyStrategy {
    type Request = CompanyProfileRequest;

    const EVENT: OnboardingEvent = OnboardingEvent::CreateCompany;

    fn validate(&self, request: &Self::Request, company: Option<&Company>) -> ValidationResult {
        let mut result = ValidationResult::success();

        if company.is_some() {
            result.add_error("Company already exists, cannot create new profile");
        }

        result.require(request.name.as_deref(), "Company name is required");
        result.require(
            request.registration_number.as_deref(),
            "Registration number is required",
        );
        result.require(request.entity_type.as_deref(), "Entity type is required");
        result.require(request.country.as_deref(), "Country is required");

        result
    }

    fn on_success(
        &self,
        request: &Self::Request,
        _company: Option<&Company>,
    ) -> Result<Company, ValidationFailed> {
        Ok(Company::from_profile(request))
    }
}
