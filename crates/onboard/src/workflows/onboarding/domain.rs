use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a canonical company row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompanyId(pub u64);

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Forward-only stage marker gating which onboarding steps are legal.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressState {
    #[default]
    Profile,
    Contact,
    Operations,
    Completed,
}

impl ProgressState {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::Profile,
            Self::Contact,
            Self::Operations,
            Self::Completed,
        ]
    }

    pub const fn next(self) -> Self {
        match self {
            Self::Profile => Self::Contact,
            Self::Contact => Self::Operations,
            Self::Operations | Self::Completed => Self::Completed,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Profile => "PROFILE",
            Self::Contact => "CONTACT",
            Self::Operations => "OPERATIONS",
            Self::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for ProgressState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full set of facts collected about an onboarding subject.
///
/// Values are never edited in place by the workflow: every step derives a new
/// `Company` from the previous one, and the derived value is staged inside an
/// approval until someone approves it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub id: Option<CompanyId>,

    pub name: Option<String>,
    pub registration_number: Option<String>,
    pub entity_type: Option<String>,
    pub industry_sector: Option<String>,
    pub date_of_incorporation: Option<NaiveDate>,
    pub registered_address: Option<String>,
    pub operating_address: Option<String>,
    pub country: Option<String>,
    pub company_size: Option<String>,
    pub description: Option<String>,

    pub main_contact_name: Option<String>,
    pub main_contact_email: Option<String>,
    pub main_contact_phone: Option<String>,
    pub contact_person_role: Option<String>,
    pub secondary_contact_name: Option<String>,
    pub technical_contact_email: Option<String>,
    pub billing_contact_email: Option<String>,
    pub authorized_persons: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub preferred_language: Option<String>,

    pub tax_id_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub preferred_payment_method: Option<String>,
    pub role_on_platform: Option<String>,
    pub requested_features: Option<String>,
    pub operating_hours: Option<String>,
    pub has_compliance_certification: Option<bool>,
    pub agreed_to_terms_of_service: Option<bool>,
    pub agreed_onboarding_date: Option<NaiveDate>,

    pub progress_state: ProgressState,
}

impl Company {
    /// Fresh company built from a profile submission; it has no identity yet.
    pub fn from_profile(request: &CompanyProfileRequest) -> Self {
        Self {
            id: None,
            name: request.name.clone(),
            registration_number: request.registration_number.clone(),
            entity_type: request.entity_type.clone(),
            industry_sector: request.industry_sector.clone(),
            date_of_incorporation: request.date_of_incorporation,
            registered_address: request.registered_address.clone(),
            operating_address: request.operating_address.clone(),
            country: request.country.clone(),
            company_size: request.company_size.clone(),
            description: request.description.clone(),
            progress_state: ProgressState::Profile,
            ..Self::default()
        }
    }

    pub fn with_contact(&self, request: &ContactInfoRequest) -> Self {
        Self {
            main_contact_name: request.main_contact_name.clone(),
            main_contact_email: request.main_contact_email.clone(),
            main_contact_phone: request.main_contact_phone.clone(),
            contact_person_role: request.contact_person_role.clone(),
            secondary_contact_name: request.secondary_contact_name.clone(),
            technical_contact_email: request.technical_contact_email.clone(),
            billing_contact_email: request.billing_contact_email.clone(),
            authorized_persons: request.authorized_persons.clone(),
            emergency_contact_number: request.emergency_contact_number.clone(),
            preferred_language: request.preferred_language.clone(),
            progress_state: ProgressState::Contact,
            ..self.clone()
        }
    }

    pub fn with_operations(&self, request: &OperationalInfoRequest) -> Self {
        Self {
            tax_id_number: request.tax_id_number.clone(),
            bank_name: request.bank_name.clone(),
            bank_account_number: request.bank_account_number.clone(),
            preferred_payment_method: request.preferred_payment_method.clone(),
            role_on_platform: request.role_on_platform.clone(),
            requested_features: request.requested_features.clone(),
            operating_hours: request.operating_hours.clone(),
            has_compliance_certification: request.has_compliance_certification,
            agreed_to_terms_of_service: request.agreed_to_terms_of_service,
            agreed_onboarding_date: request.agreed_onboarding_date,
            progress_state: ProgressState::Operations,
            ..self.clone()
        }
    }

    pub fn completed(&self) -> Self {
        Self {
            progress_state: ProgressState::Completed,
            ..self.clone()
        }
    }

    /// Same facts under a given identity.
    pub fn with_id(self, id: CompanyId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }
}

/// Registration facts submitted when a company first enters onboarding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfileRequest {
    pub name: Option<String>,
    pub registration_number: Option<String>,
    pub entity_type: Option<String>,
    pub industry_sector: Option<String>,
    pub date_of_incorporation: Option<NaiveDate>,
    pub registered_address: Option<String>,
    pub operating_address: Option<String>,
    pub country: Option<String>,
    pub company_size: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactInfoRequest {
    pub main_contact_name: Option<String>,
    pub main_contact_email: Option<String>,
    pub main_contact_phone: Option<String>,
    pub contact_person_role: Option<String>,
    pub secondary_contact_name: Option<String>,
    pub technical_contact_email: Option<String>,
    pub billing_contact_email: Option<String>,
    pub authorized_persons: Option<String>,
    pub emergency_contact_number: Option<String>,
    pub preferred_language: Option<String>,
}

/// Banking, tax, and platform details. The two flags are tri-state on
/// purpose: `None` means the applicant never answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OperationalInfoRequest {
    pub tax_id_number: Option<String>,
    pub bank_name: Option<String>,
    pub bank_account_number: Option<String>,
    pub preferred_payment_method: Option<String>,
    pub role_on_platform: Option<String>,
    pub requested_features: Option<String>,
    pub operating_hours: Option<String>,
    pub has_compliance_certification: Option<bool>,
    pub agreed_to_terms_of_service: Option<bool>,
    pub agreed_onboarding_date: Option<NaiveDate>,
}

/// Workflow events a caller can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingEvent {
    CreateCompany,
    UpdateContactInfo,
    UpdateOperationalInfo,
    CompleteOnboarding,
}

impl OnboardingEvent {
    pub const fn label(self) -> &'static str {
        match self {
            Self::CreateCompany => "CREATE_COMPANY",
            Self::UpdateContactInfo => "UPDATE_CONTACT_INFO",
            Self::UpdateOperationalInfo => "UPDATE_OPERATIONAL_INFO",
            Self::CompleteOnboarding => "COMPLETE_ONBOARDING",
        }
    }
}

impl fmt::Display for OnboardingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An event together with its payload. Each variant is bound to exactly one
/// strategy, so dispatch is a `match` rather than a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OnboardingRequest {
    CreateCompany(CompanyProfileRequest),
    UpdateContactInfo(ContactInfoRequest),
    UpdateOperationalInfo(OperationalInfoRequest),
    CompleteOnboarding,
}

impl OnboardingRequest {
    pub const fn event(&self) -> OnboardingEvent {
        match self {
            Self::CreateCompany(_) => OnboardingEvent::CreateCompany,
            Self::UpdateContactInfo(_) => OnboardingEvent::UpdateContactInfo,
            Self::UpdateOperationalInfo(_) => OnboardingEvent::UpdateOperationalInfo,
            Self::CompleteOnboarding => OnboardingEvent::CompleteOnboarding,
        }
    }
}
