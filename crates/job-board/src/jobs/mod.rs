//! Job postings: the public listing, recruiter-owned writes, and the cascade
//! that removes a job's applications before the job itself.

pub mod cascade;
pub mod domain;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use cascade::{delete_job_cascade, CascadeError, CascadeOutcome};
pub use domain::{Job, JobDraft, JobPatch, JOB_SEARCH_FIELDS};
pub use router::job_router;
pub use service::JobService;
