use crate::infra::{in_memory_service, parse_date};
use chrono::{NaiveDate, Utc};
use clap::Args;
use onboard::config::{AppConfig, WorkflowConfig};
use onboard::error::AppError;
use onboard::workflows::onboarding::{
    Approval, Company, CompanyProfileRequest, ContactInfoRequest, OnboardingError,
    OperationalInfoRequest, RepositoryError,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Legal name of the company to onboard.
    #[arg(long, default_value = "Acme Trading Pte Ltd")]
    pub(crate) company_name: String,
    /// Identity recorded as submitter and approver. Defaults to the system actor.
    #[arg(long)]
    pub(crate) actor: Option<String>,
    /// Agreed onboarding date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) onboarding_date: Option<NaiveDate>,
}

/// What the demo left behind, kept separate from printing so it can be checked.
#[derive(Debug)]
pub(crate) struct DemoOutcome {
    pub(crate) decisions: Vec<Approval>,
    pub(crate) company: Company,
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    println!("Company onboarding demo");
    let outcome = walk_through(&args, &config.workflow)?;

    println!("\nApproval trail");
    for approval in &outcome.decisions {
        render_approval(approval);
    }

    println!("\nFinal company record");
    render_company(&outcome.company);
    Ok(())
}

pub(crate) fn walk_through(
    args: &DemoArgs,
    workflow: &WorkflowConfig,
) -> Result<DemoOutcome, AppError> {
    let service = in_memory_service(workflow)?;
    let actor = args.actor.as_deref();
    let onboarding_date = args
        .onboarding_date
        .unwrap_or_else(|| Utc::now().date_naive());
    let mut decisions = Vec::new();

    let profile = service.create_profile(demo_profile(&args.company_name), actor)?;
    let created = service.approve(profile, actor)?;
    let company_id = created.data_id.ok_or_else(|| {
        OnboardingError::from(RepositoryError::Unavailable(
            "approved profile did not produce a company id".to_string(),
        ))
    })?;
    decisions.push(created);

    // Reviewer turns down the first contact submission.
    let draft = service.update_contact(company_id, demo_contact("sales@example.com"), actor)?;
    decisions.push(service.reject(draft, Some("Use a finance contact for billing"), actor)?);

    let contact = service.update_contact(company_id, demo_contact("finance@example.com"), actor)?;
    decisions.push(service.approve(contact, actor)?);

    let operations =
        service.update_operations(company_id, demo_operations(onboarding_date), actor)?;
    decisions.push(service.approve(operations, actor)?);

    let completion = service.complete(company_id, actor)?;
    decisions.push(service.approve(completion, actor)?);

    let company = service.company(company_id)?;
    Ok(DemoOutcome { decisions, company })
}

fn demo_profile(name: &str) -> CompanyProfileRequest {
    CompanyProfileRequest {
        name: Some(name.to_string()),
        registration_number: Some("201912345K".to_string()),
        entity_type: Some("Private Limited".to_string()),
        industry_sector: Some("Wholesale".to_string()),
        country: Some("SG".to_string()),
        registered_address: Some("1 Raffles Place, Singapore".to_string()),
        company_size: Some("11-50".to_string()),
        ..CompanyProfileRequest::default()
    }
}

fn demo_contact(billing_email: &str) -> ContactInfoRequest {
    ContactInfoRequest {
        main_contact_name: Some("Jane Tan".to_string()),
        main_contact_email: Some("jane.tan@example.com".to_string()),
        main_contact_phone: Some("+65 6123 4567".to_string()),
        contact_person_role: Some("Director".to_string()),
        billing_contact_email: Some(billing_email.to_string()),
        preferred_language: Some("en".to_string()),
        ..ContactInfoRequest::default()
    }
}

fn demo_operations(onboarding_date: NaiveDate) -> OperationalInfoRequest {
    OperationalInfoRequest {
        tax_id_number: Some("M2-1234567-8".to_string()),
        bank_name: Some("DBS Bank".to_string()),
        bank_account_number: Some("072-123456-7".to_string()),
        preferred_payment_method: Some("BANK_TRANSFER".to_string()),
        role_on_platform: Some("SUPPLIER".to_string()),
        operating_hours: Some("Mon-Fri 09:00-18:00".to_string()),
        has_compliance_certification: Some(true),
        agreed_to_terms_of_service: Some(true),
        agreed_onboarding_date: Some(onboarding_date),
        ..OperationalInfoRequest::default()
    }
}

fn render_approval(approval: &Approval) {
    let company = approval
        .data_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- #{} {:?} company {} -> {} by {}",
        approval.id,
        approval.operation_type,
        company,
        approval.approval_status,
        approval.approved_by.as_deref().unwrap_or("-")
    );
    if let Some(summary) = approval.change_summary.as_deref() {
        println!("  changed: {summary}");
    }
    if let Some(remarks) = approval.remarks.as_deref() {
        println!("  remarks: {remarks}");
    }
}

fn render_company(company: &Company) {
    let id = company
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "- id {} | {} | state {}",
        id,
        company.name.as_deref().unwrap_or("-"),
        company.progress_state
    );
    println!(
        "- contact {} <{}>",
        company.main_contact_name.as_deref().unwrap_or("-"),
        company.main_contact_email.as_deref().unwrap_or("-")
    );
    println!(
        "- billing {}",
        company.billing_contact_email.as_deref().unwrap_or("-")
    );
    if let Some(date) = company.agreed_onboarding_date {
        println!("- onboarding agreed for {date}");
    }
}
