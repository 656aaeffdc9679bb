use super::{
    existing, require_state, OnboardingStrategy, ValidationFailed, ValidationResult, COMPANY_MISSING,
};
use crate::workflows::onboarding::domain::{
    Company, ContactInfoRequest, OnboardingEvent, ProgressState,
};
use crate::workflows::onboarding::validation::looks_like_email;

#[derive(Debug, Clone, Copy, Default)]
pub struct UpdateContactInfoStrategy;

impl OnboardingStrategy for UpdateContactInfoStrategy {
    type Request = ContactInfoRequest;

    const EVENT: OnboardingEvent = OnboardingEvent::UpdateContactInfo;

    fn validate(&self, request: &Self::Request, company: Option<&Company>) -> ValidationResult {
        let Some(company) = company else {
            return ValidationResult::failure(COMPANY_MISSING);
        };

        let mut result = ValidationResult::success();

        // Re-submitting contact details while still in CONTACT is allowed.
        require_state(
            &mut result,
            company,
            &[ProgressState::Profile, ProgressState::Contact],
            "Cannot update contact info",
        );

        result.require(
            request.main_contact_name.as_deref(),
            "Main contact name is required",
        );
        result.require(
            request.main_contact_email.as_deref(),
            "Main contact email is required",
        );
        result.require(
            request.main_contact_phone.as_deref(),
            "Main contact phone is required",
        );
        result.require(
            request.contact_person_role.as_deref(),
            "Contact person role is required",
        );

        if let Some(email) = request.main_contact_email.as_deref() {
            if !looks_like_email(email) {
                result.add_error("Invalid main contact email format");
            }
        }

        for (email, message) in [
            (
                request.technical_contact_email.as_deref(),
                "Invalid technical contact email format",
            ),
            (
                request.billing_contact_email.as_deref(),
                "Invalid billing contact email format",
            ),
        ] {
            if let Some(email) = email.filter(|email| !email.trim().is_empty()) {
                if !looks_like_email(email) {
                    result.add_error(message);
                }
            }
        }

        result
    }

    fn on_success(
        &self,
        request: &Self::Request,
        company: Option<&Company>,
    ) -> Result<Company, ValidationFailed> {
        Ok(existing(company)?.with_contact(request))
    }
}
