use std::collections::HashMap;
use std::sync::Arc;

use serde_json::{json, Value};
use tracing::info;

use super::cascade::{delete_job_cascade, CascadeOutcome};
use super::domain::{Job, JobDraft, JobPatch, JOB_SEARCH_FIELDS};
use crate::accounts::{Identity, Role, User};
use crate::applications::Application;
use crate::error::{parse_id, ServiceError};
use crate::query::{execute, Filter, FilterBuilder, ListingPage, QueryOptions, SortOrder, Window};
use crate::store::{Collection, ObjectId, RepositoryError};

/// Job postings: public listing plus recruiter-owned writes.
pub struct JobService<U, J, A> {
    users: Arc<U>,
    jobs: Arc<J>,
    applications: Arc<A>,
}

impl<U, J, A> JobService<U, J, A>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    pub fn new(users: Arc<U>, jobs: Arc<J>, applications: Arc<A>) -> Self {
        Self {
            users,
            jobs,
            applications,
        }
    }

    /// Public listing. `recruiterId` narrows to one recruiter's postings and
    /// never reaches the filter as a raw field.
    pub fn list(&self, params: &HashMap<String, String>) -> Result<ListingPage, ServiceError> {
        let mut builder = FilterBuilder::new(&JOB_SEARCH_FIELDS).ignoring("recruiterId");
        if let Some(raw) = params.get("recruiterId") {
            let recruiter = parse_id(raw, "recruiter ID")?;
            builder = builder.scoped("createdBy", recruiter);
        }
        let filter = builder.build(params);
        let options = QueryOptions::resolve(params)?;
        Ok(execute(self.jobs.as_ref(), &filter, &options)?)
    }

    /// Jobs posted by the caller (or, for admins, by the named recruiter),
    /// newest first, with `createdBy` expanded to the owner's name and email.
    /// An empty list is a valid answer here.
    pub fn my_jobs(
        &self,
        identity: &Identity,
        requested: Option<&str>,
    ) -> Result<Vec<Value>, ServiceError> {
        let owner_id = identity.scope_for(requested, "recruiter ID")?;
        let filter = Filter::default().with_equal("createdBy", owner_id.to_hex());
        let jobs = self.jobs.find(&filter, SortOrder::Newest, Window::all())?;

        let owner = match self.users.get(&owner_id)? {
            Some(user) => json!({
                "id": user.id,
                "FullName": user.full_name,
                "email": user.email,
            }),
            None => Value::Null,
        };

        jobs.iter()
            .map(|job| -> Result<Value, ServiceError> {
                let mut encoded = serde_json::to_value(job)
                    .map_err(|err| RepositoryError::Encoding(err.to_string()))?;
                if let Some(object) = encoded.as_object_mut() {
                    object.insert("createdBy".to_string(), owner.clone());
                }
                Ok(encoded)
            })
            .collect()
    }

    pub fn get(&self, raw_id: &str) -> Result<Job, ServiceError> {
        let id = parse_id(raw_id, "job ID")?;
        self.find_job(&id)
    }

    pub fn create(&self, identity: &Identity, draft: JobDraft) -> Result<Job, ServiceError> {
        identity.require_any(&[Role::Recruiter, Role::Admin])?;
        let job = draft.into_job(identity.user_id)?;
        let (key, label) = (posting_key(&job), posting_label(&job));
        let stored = self
            .jobs
            .insert_unique(job, &key)
            .map_err(|err| posting_conflict(err, &label))?;
        info!(
            job_id = %stored.id,
            created_by = %stored.created_by,
            company = %stored.company,
            "job created"
        );
        Ok(stored)
    }

    pub fn update(
        &self,
        identity: &Identity,
        raw_id: &str,
        patch: JobPatch,
    ) -> Result<Job, ServiceError> {
        let id = parse_id(raw_id, "job ID")?;
        let job = self.find_job(&id)?;
        authorize_owner(identity, &job, "update")?;

        let updated = patch.apply(job)?;
        let (key, label) = (posting_key(&updated), posting_label(&updated));
        let stored = self
            .jobs
            .replace_unique(updated, &key)
            .map_err(|err| posting_conflict(err, &label))?;
        info!(job_id = %stored.id, updated_by = %identity.user_id, "job updated");
        Ok(stored)
    }

    /// Remove a job together with its applications.
    pub fn delete(&self, identity: &Identity, raw_id: &str) -> Result<CascadeOutcome, ServiceError> {
        let id = parse_id(raw_id, "job ID")?;
        let job = self.find_job(&id)?;
        authorize_owner(identity, &job, "delete")?;

        let outcome = delete_job_cascade(self.jobs.as_ref(), self.applications.as_ref(), &id)?;
        info!(
            job_id = %id,
            deleted_by = %identity.user_id,
            applications_removed = outcome.applications_removed,
            "job deleted"
        );
        Ok(outcome)
    }

    fn find_job(&self, id: &ObjectId) -> Result<Job, ServiceError> {
        self.jobs
            .get(id)?
            .ok_or_else(|| ServiceError::NotFound("Job not found".into()))
    }
}

/// (company, position), compared without regard to case, identifies a posting.
fn posting_key(job: &Job) -> Filter {
    Filter::default()
        .with_equal_ignore_case("company", &job.company)
        .with_equal_ignore_case("position", &job.position)
}

fn posting_label(job: &Job) -> String {
    format!("{} already has a {} posting", job.company, job.position)
}

fn posting_conflict(err: RepositoryError, label: &str) -> ServiceError {
    match err {
        RepositoryError::Conflict => ServiceError::Conflict(label.to_string()),
        other => other.into(),
    }
}

fn authorize_owner(identity: &Identity, job: &Job, action: &str) -> Result<(), ServiceError> {
    if job.created_by == identity.user_id || identity.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(format!("Unauthorized user to {action} job")))
    }
}
