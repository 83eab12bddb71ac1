use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ServiceError;
use crate::store::{Document, ObjectId};

/// Review state of an application.
///
/// Recruiters may move an application to `Accepted` or `Rejected` from any
/// state, including reversing an earlier decision. Nothing returns it to
/// `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Parse a requested transition target.
    pub fn parse_decision(raw: &str) -> Result<Self, ServiceError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            _ => Err(ServiceError::Validation(
                "status must be either accepted or rejected".into(),
            )),
        }
    }

    pub fn transition(self, target: ApplicationStatus) -> Result<Self, ServiceError> {
        match target {
            ApplicationStatus::Accepted | ApplicationStatus::Rejected => Ok(target),
            ApplicationStatus::Pending => Err(ServiceError::Validation(format!(
                "cannot move a {} application back to pending",
                self.label()
            ))),
        }
    }
}

/// Link between an applicant and a job, reviewed by `recruiter_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ObjectId,
    pub applicant_id: ObjectId,
    pub recruiter_id: ObjectId,
    pub job_id: ObjectId,
    pub status: ApplicationStatus,
    pub resume: String,
    pub date_of_application: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Document for Application {
    const KIND: &'static str = "Application";

    fn id(&self) -> ObjectId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Body of `POST /application/apply`. The applicant is the caller.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSubmission {
    #[serde(default)]
    pub recruiter_id: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub resume: Option<String>,
}

/// Body of `PATCH /application/:id`. The reviewing recruiter is the caller.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: String,
}
