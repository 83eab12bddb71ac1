use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::{Document, ObjectId};

/// Text fields searched by `search=` on job listings.
pub const JOB_SEARCH_FIELDS: [&str; 5] =
    ["company", "position", "jobStatus", "jobType", "jobLocation"];

/// A posting owned by the recruiter in `created_by`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: ObjectId,
    pub company: String,
    pub position: String,
    pub job_type: String,
    pub job_location: String,
    pub job_status: String,
    pub job_description: String,
    pub job_skills: Vec<String>,
    pub salary: String,
    pub job_deadline: Option<NaiveDate>,
    pub created_by: ObjectId,
    pub created_at: DateTime<Utc>,
}

impl Document for Job {
    const KIND: &'static str = "Job";

    fn id(&self) -> ObjectId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /jobs`. Ownership comes from the caller, never the body.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub job_location: String,
    #[serde(default)]
    pub job_status: String,
    #[serde(default)]
    pub job_description: String,
    #[serde(default)]
    pub job_skills: Vec<String>,
    #[serde(default)]
    pub salary: String,
    #[serde(default)]
    pub job_deadline: Option<NaiveDate>,
}

impl JobDraft {
    pub fn into_job(self, owner: ObjectId) -> Result<Job, ServiceError> {
        let job = Job {
            id: ObjectId::new(),
            company: self.company.trim().to_string(),
            position: self.position.trim().to_string(),
            job_type: self.job_type.trim().to_string(),
            job_location: self.job_location.trim().to_string(),
            job_status: self.job_status.trim().to_string(),
            job_description: self.job_description.trim().to_string(),
            job_skills: clean_skills(self.job_skills),
            salary: self.salary.trim().to_string(),
            job_deadline: self.job_deadline,
            created_by: owner,
            created_at: Utc::now(),
        };
        validate(&job)?;
        Ok(job)
    }
}

/// Body of `PATCH /jobs/:id`; absent fields are left alone. An explicit
/// `"jobDeadline": null` clears the deadline.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub job_type: Option<String>,
    pub job_location: Option<String>,
    pub job_status: Option<String>,
    pub job_description: Option<String>,
    pub job_skills: Option<Vec<String>>,
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub job_deadline: Option<Option<NaiveDate>>,
}

/// Marks a field that appeared in the body, even as `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl JobPatch {
    pub fn apply(self, mut job: Job) -> Result<Job, ServiceError> {
        let trimmed = |value: String| value.trim().to_string();
        if let Some(company) = self.company {
            job.company = trimmed(company);
        }
        if let Some(position) = self.position {
            job.position = trimmed(position);
        }
        if let Some(job_type) = self.job_type {
            job.job_type = trimmed(job_type);
        }
        if let Some(job_location) = self.job_location {
            job.job_location = trimmed(job_location);
        }
        if let Some(job_status) = self.job_status {
            job.job_status = trimmed(job_status);
        }
        if let Some(job_description) = self.job_description {
            job.job_description = trimmed(job_description);
        }
        if let Some(job_skills) = self.job_skills {
            job.job_skills = clean_skills(job_skills);
        }
        if let Some(salary) = self.salary {
            job.salary = trimmed(salary);
        }
        if let Some(deadline) = self.job_deadline {
            job.job_deadline = deadline;
        }
        validate(&job)?;
        Ok(job)
    }
}

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}

fn validate(job: &Job) -> Result<(), ServiceError> {
    for (value, name) in [
        (&job.company, "company"),
        (&job.position, "position"),
        (&job.job_location, "jobLocation"),
    ] {
        if value.is_empty() {
            return Err(ServiceError::Validation(format!("{name} is required")));
        }
    }
    Ok(())
}
