//! Applications: submitting to a job, the recruiter's accept/reject decision,
//! and the listings each side sees.

pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{Application, ApplicationStatus, ApplicationSubmission, StatusUpdate};
pub use router::application_router;
pub use service::{ApplicationService, APPLICATION_SEARCH_FIELDS};
