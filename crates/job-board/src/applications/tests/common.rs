use std::collections::HashMap;
use std::sync::Arc;

use axum::response::Response;
use axum::{Extension, Router};
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::accounts::{Identity, Role, TokenAuthority, User};
use crate::applications::{
    application_router, Application, ApplicationService, ApplicationSubmission,
};
use crate::jobs::{Job, JobDraft};
use crate::store::{Collection, MemoryCollection, ObjectId};

pub(super) type Jobs = MemoryCollection<Job>;
pub(super) type Applications = MemoryCollection<Application>;

pub(super) struct Board {
    pub(super) service: Arc<ApplicationService<Jobs, Applications>>,
    pub(super) jobs: Arc<Jobs>,
    pub(super) applications: Arc<Applications>,
    pub(super) recruiter: Identity,
    pub(super) job: Job,
}

/// One recruiter with one open job and no applications yet.
pub(super) fn board() -> Board {
    let jobs = Arc::new(Jobs::default());
    let applications = Arc::new(Applications::default());
    let service = Arc::new(ApplicationService::new(jobs.clone(), applications.clone()));
    let recruiter = Identity::new(ObjectId::new(), Role::Recruiter);
    let job = post_job(&jobs, &recruiter, "Abcorp", "Engineer");
    Board {
        service,
        jobs,
        applications,
        recruiter,
        job,
    }
}

pub(super) fn post_job(jobs: &Jobs, owner: &Identity, company: &str, position: &str) -> Job {
    let job = JobDraft {
        company: company.to_string(),
        position: position.to_string(),
        job_location: "Remote".to_string(),
        ..JobDraft::default()
    }
    .into_job(owner.user_id)
    .expect("valid draft");
    jobs.insert(job).expect("insert job")
}

pub(super) fn applicant() -> Identity {
    Identity::new(ObjectId::new(), Role::User)
}

pub(super) fn submission_for(job: &Job) -> ApplicationSubmission {
    ApplicationSubmission {
        recruiter_id: job.created_by.to_hex(),
        job_id: job.id.to_hex(),
        resume: Some("https://cv.example.com/applicant.pdf".to_string()),
    }
}

/// Backdate an application so newest-first ordering is observable.
pub(super) fn backdate(applications: &Applications, application: &Application, hours: i64) {
    let mut older = application.clone();
    older.created_at = Utc::now() - Duration::hours(hours);
    applications.replace(older).expect("replace");
}

pub(super) fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::new("applications-tests", Duration::hours(1)))
}

pub(super) fn bearer(authority: &TokenAuthority, identity: &Identity) -> String {
    let user = User {
        id: identity.user_id,
        full_name: "Test Caller".to_string(),
        email: "caller@example.com".to_string(),
        password_hash: String::new(),
        role: identity.role,
        location: String::new(),
        resume: String::new(),
        gender: String::new(),
        created_at: Utc::now(),
    };
    let token = authority.issue(&user).expect("issue token");
    format!("Bearer {token}")
}

pub(super) fn application_router_with_service(
    service: Arc<ApplicationService<Jobs, Applications>>,
    authority: Arc<TokenAuthority>,
) -> Router {
    application_router(service).layer(Extension(authority))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
