mod cli;
mod demo;
mod infra;
mod routes;
mod server;

use axum::Extension;
use onboard::config::WorkflowConfig;
use onboard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}

/// The full HTTP surface over fresh in-memory stores, already marked ready.
/// Metrics are rendered from a recorder that is not installed globally.
pub fn app(workflow: &WorkflowConfig) -> Result<axum::Router, AppError> {
    let service = infra::in_memory_service(workflow)?;
    Ok(routes::with_onboarding_routes(service).layer(Extension(infra::AppState::detached(true))))
}
