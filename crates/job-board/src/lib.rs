//! Job board core: listings over jobs and applications, the application
//! status workflow, and the account/identity layer that guards them.

pub mod accounts;
pub mod admin;
pub mod applications;
pub mod config;
pub mod error;
pub mod jobs;
pub mod query;
pub mod store;
pub mod telemetry;
