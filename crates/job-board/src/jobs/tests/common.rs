use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::response::Response;
use axum::{Extension, Router};
use chrono::{Duration, TimeZone, Utc};
use serde_json::Value;

use crate::accounts::{Identity, Role, TokenAuthority, User};
use crate::applications::{Application, ApplicationStatus};
use crate::jobs::{job_router, Job, JobDraft, JobService};
use crate::query::{Filter, SortOrder, Window};
use crate::store::{Collection, MemoryCollection, ObjectId, RepositoryError};

pub(super) type Users = MemoryCollection<User>;
pub(super) type Jobs = MemoryCollection<Job>;
pub(super) type Applications = MemoryCollection<Application>;
pub(super) type Service = JobService<Users, Jobs, Applications>;

pub(super) fn build_service() -> (Arc<Service>, Arc<Jobs>, Arc<Applications>) {
    let (service, jobs, applications, _) = build_service_with_users();
    (service, jobs, applications)
}

pub(super) fn build_service_with_users(
) -> (Arc<Service>, Arc<Jobs>, Arc<Applications>, Arc<Users>) {
    let users = Arc::new(Users::default());
    let jobs = Arc::new(Jobs::default());
    let applications = Arc::new(Applications::default());
    let service = Arc::new(JobService::new(
        users.clone(),
        jobs.clone(),
        applications.clone(),
    ));
    (service, jobs, applications, users)
}

/// Store an account for `identity` so owner lookups resolve.
pub(super) fn enroll(users: &Users, identity: &Identity, full_name: &str) -> User {
    users
        .insert(User {
            id: identity.user_id,
            full_name: full_name.to_string(),
            email: format!("{}@jobboard.test", full_name.to_lowercase().replace(' ', ".")),
            password_hash: String::new(),
            role: identity.role,
            location: String::new(),
            resume: String::new(),
            gender: String::new(),
            created_at: Utc::now(),
        })
        .expect("insert user")
}

pub(super) fn recruiter() -> Identity {
    Identity::new(ObjectId::new(), Role::Recruiter)
}

pub(super) fn draft(company: &str, position: &str) -> JobDraft {
    JobDraft {
        company: company.to_string(),
        position: position.to_string(),
        job_type: "full-time".to_string(),
        job_location: "Remote".to_string(),
        job_status: "open".to_string(),
        job_description: "Build and run services".to_string(),
        job_skills: vec!["rust".to_string(), "sql".to_string()],
        salary: "90000".to_string(),
        job_deadline: None,
    }
}

/// Insert `count` jobs for `owner`, one hour apart, oldest first.
pub(super) fn seed_jobs(jobs: &Jobs, owner: ObjectId, count: i64) -> Vec<Job> {
    let base = Utc
        .with_ymd_and_hms(2025, 2, 1, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    (1..=count)
        .map(|n| {
            let mut job = draft(&format!("Company {n:02}"), &format!("Role {n:02}"))
                .into_job(owner)
                .expect("valid draft");
            job.created_at = base + Duration::hours(n);
            jobs.insert(job).expect("insert job")
        })
        .collect()
}

pub(super) fn seed_applications(applications: &Applications, job: &Job, count: usize) {
    for _ in 0..count {
        let now = Utc::now();
        applications
            .insert(Application {
                id: ObjectId::new(),
                applicant_id: ObjectId::new(),
                recruiter_id: job.created_by,
                job_id: job.id,
                status: ApplicationStatus::Pending,
                resume: String::new(),
                date_of_application: now,
                created_at: now,
            })
            .expect("insert application");
    }
}

pub(super) fn applications_for(applications: &Applications, job: &Job) -> u64 {
    applications
        .count(&Filter::default().with_equal("jobId", job.id.to_hex()))
        .expect("count")
}

pub(super) fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

pub(super) fn authority() -> Arc<TokenAuthority> {
    Arc::new(TokenAuthority::new("jobs-tests", Duration::hours(1)))
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

pub(super) fn job_router_with_service(
    service: Arc<Service>,
    authority: Arc<TokenAuthority>,
) -> Router {
    job_router(service).layer(Extension(authority))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Job collection whose deletes fail on demand, for interrupting a cascade
/// between its two phases.
#[derive(Default)]
pub(super) struct FlakyJobs {
    pub(super) inner: Jobs,
    pub(super) fail_deletes: AtomicBool,
}

impl FlakyJobs {
    pub(super) fn set_failing(&self, failing: bool) {
        self.fail_deletes.store(failing, Ordering::SeqCst);
    }
}

impl Collection<Job> for FlakyJobs {
    fn insert(&self, document: Job) -> Result<Job, RepositoryError> {
        self.inner.insert(document)
    }

    fn insert_unique(&self, document: Job, key: &Filter) -> Result<Job, RepositoryError> {
        self.inner.insert_unique(document, key)
    }

    fn replace(&self, document: Job) -> Result<Job, RepositoryError> {
        self.inner.replace(document)
    }

    fn replace_unique(&self, document: Job, key: &Filter) -> Result<Job, RepositoryError> {
        self.inner.replace_unique(document, key)
    }

    fn get(&self, id: &ObjectId) -> Result<Option<Job>, RepositoryError> {
        self.inner.get(id)
    }

    fn find(
        &self,
        filter: &Filter,
        sort: SortOrder,
        window: Window,
    ) -> Result<Vec<Job>, RepositoryError> {
        self.inner.find(filter, sort, window)
    }

    fn count(&self, filter: &Filter) -> Result<u64, RepositoryError> {
        self.inner.count(filter)
    }

    fn delete(&self, id: &ObjectId) -> Result<Option<Job>, RepositoryError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("job store offline".into()));
        }
        self.inner.delete(id)
    }

    fn delete_many(&self, filter: &Filter) -> Result<u64, RepositoryError> {
        self.inner.delete_many(filter)
    }
}
