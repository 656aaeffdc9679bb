//! Multi-step company onboarding with maker-checker approval.
//!
//! Every submitted step is validated, turned into a full snapshot of the
//! company it would produce, and parked as a pending approval. Only an
//! approval decision writes to the company store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
