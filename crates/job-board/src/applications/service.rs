use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{Application, ApplicationStatus, ApplicationSubmission};
use crate::accounts::Identity;
use crate::error::{parse_id, ServiceError};
use crate::jobs::Job;
use crate::query::{execute, Filter, FilterBuilder, ListingPage, QueryOptions, SortOrder, Window};
use crate::store::{Collection, ObjectId, RepositoryError};

/// Fields matched by `search=` on an applicant's listing.
pub const APPLICATION_SEARCH_FIELDS: [&str; 2] = ["status", "resume"];

/// Applying to jobs and reviewing the applications a recruiter receives.
pub struct ApplicationService<J, A> {
    jobs: Arc<J>,
    applications: Arc<A>,
}

impl<J, A> ApplicationService<J, A>
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    pub fn new(jobs: Arc<J>, applications: Arc<A>) -> Self {
        Self { jobs, applications }
    }

    /// File a `pending` application for the caller. One application per
    /// (applicant, job) pair.
    pub fn apply_to_job(
        &self,
        applicant: &Identity,
        submission: ApplicationSubmission,
    ) -> Result<Application, ServiceError> {
        let recruiter_id = parse_id(&submission.recruiter_id, "recruiter ID")?;
        let job_id = parse_id(&submission.job_id, "job ID")?;

        let job = self
            .jobs
            .get(&job_id)?
            .ok_or_else(|| ServiceError::NotFound("Job not found".into()))?;
        if job.created_by != recruiter_id {
            return Err(ServiceError::Validation(
                "recruiterId does not match the job's recruiter".into(),
            ));
        }

        let now = Utc::now();
        let application = Application {
            id: ObjectId::new(),
            applicant_id: applicant.user_id,
            recruiter_id,
            job_id,
            status: ApplicationStatus::Pending,
            resume: submission.resume.unwrap_or_default().trim().to_string(),
            date_of_application: now,
            created_at: now,
        };

        let pair = Filter::default()
            .with_equal("applicantId", applicant.user_id.to_hex())
            .with_equal("jobId", job_id.to_hex());
        let stored = match self.applications.insert_unique(application, &pair) {
            Err(RepositoryError::Conflict) => {
                return Err(ServiceError::Conflict(
                    "You have already applied for this job".into(),
                ))
            }
            other => other?,
        };
        info!(
            application_id = %stored.id,
            applicant_id = %stored.applicant_id,
            job_id = %stored.job_id,
            "application submitted"
        );
        Ok(stored)
    }

    /// Decide an application. Only the recruiter it was filed with may do so;
    /// any refusal leaves the stored status as it was.
    pub fn update_status(
        &self,
        reviewer: &Identity,
        raw_id: &str,
        raw_status: &str,
    ) -> Result<Application, ServiceError> {
        let id = parse_id(raw_id, "application ID")?;
        let target = ApplicationStatus::parse_decision(raw_status)?;

        let mut application = self
            .applications
            .get(&id)?
            .ok_or_else(|| ServiceError::NotFound("Application not found".into()))?;
        if application.recruiter_id != reviewer.user_id {
            warn!(
                application_id = %id,
                reviewer = %reviewer.user_id,
                "status change refused for foreign recruiter"
            );
            return Err(ServiceError::Forbidden(
                "Unauthorized user to update job".into(),
            ));
        }

        let previous = application.status;
        application.status = previous.transition(target)?;
        let stored = self.applications.replace(application)?;
        info!(
            application_id = %stored.id,
            from = previous.label(),
            to = stored.status.label(),
            "application status changed"
        );
        Ok(stored)
    }

    /// Paginated applications filed by the caller, with `jobId` expanded to
    /// the job it names.
    pub fn applicant_jobs(
        &self,
        identity: &Identity,
        params: &HashMap<String, String>,
    ) -> Result<ListingPage, ServiceError> {
        let applicant = identity.scope_for(
            params.get("applicantId").map(String::as_str),
            "applicant ID",
        )?;
        let filter = FilterBuilder::new(&APPLICATION_SEARCH_FIELDS)
            .ignoring("applicantId")
            .scoped("applicantId", applicant)
            .build(params);
        let options = QueryOptions::resolve(params)?;

        let mut page = execute(self.applications.as_ref(), &filter, &options)?;
        page.result = self.populate_jobs(page.result)?;
        Ok(page)
    }

    /// Every application received by the caller, newest first, with jobs
    /// expanded.
    pub fn recruiter_jobs(
        &self,
        identity: &Identity,
        requested: Option<&str>,
    ) -> Result<Vec<Value>, ServiceError> {
        let recruiter = identity.scope_for(requested, "recruiter ID")?;
        let filter = Filter::default().with_equal("recruiterId", recruiter.to_hex());
        let received = self
            .applications
            .find(&filter, SortOrder::Newest, Window::all())?;
        if received.is_empty() {
            return Err(ServiceError::NotFound("No Job Found".into()));
        }

        let encoded = received
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| RepositoryError::Encoding(err.to_string()))?;
        self.populate_jobs(encoded)
    }

    /// Replace each `jobId` string with the job document, or `null` when the
    /// job no longer exists.
    fn populate_jobs(&self, records: Vec<Value>) -> Result<Vec<Value>, ServiceError> {
        let mut cache: HashMap<String, Value> = HashMap::new();
        let mut populated = Vec::with_capacity(records.len());

        for mut record in records {
            let job_ref = record
                .get("jobId")
                .and_then(Value::as_str)
                .map(str::to_string);
            if let Some(raw) = job_ref {
                let job = match cache.get(&raw) {
                    Some(job) => job.clone(),
                    None => {
                        let job = self.lookup_job(&raw)?;
                        cache.insert(raw.clone(), job.clone());
                        job
                    }
                };
                if let Some(object) = record.as_object_mut() {
                    object.insert("jobId".to_string(), job);
                }
            }
            populated.push(record);
        }
        Ok(populated)
    }

    fn lookup_job(&self, raw: &str) -> Result<Value, ServiceError> {
        let Ok(id) = ObjectId::parse(raw) else {
            return Ok(Value::Null);
        };
        match self.jobs.get(&id)? {
            Some(job) => Ok(serde_json::to_value(job)
                .map_err(|err| RepositoryError::Encoding(err.to_string()))?),
            None => Ok(Value::Null),
        }
    }
}
