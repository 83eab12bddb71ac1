use tracing::{error, info};

use super::domain::Job;
use crate::applications::Application;
use crate::query::Filter;
use crate::store::{Collection, ObjectId, RepositoryError};

/// Result of a completed cascade.
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeOutcome {
    pub job: Job,
    pub applications_removed: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum CascadeError {
    #[error("Job not found")]
    JobNotFound,
    #[error("failed to remove applications for job {job_id}: {source}")]
    Children {
        job_id: ObjectId,
        #[source]
        source: RepositoryError,
    },
    /// Applications are gone but the job survived. Re-running the cascade
    /// finishes the job deletion.
    #[error("removed {applications_removed} applications but failed to delete job {job_id}: {source}")]
    Parent {
        job_id: ObjectId,
        applications_removed: u64,
        #[source]
        source: RepositoryError,
    },
}

/// Delete a job and every application that references it.
///
/// Phase one removes the applications, phase two the job. The phases are not
/// atomic; a failure between them leaves the job in place with no applications,
/// and calling this again completes the deletion.
pub fn delete_job_cascade<J, A>(
    jobs: &J,
    applications: &A,
    job_id: &ObjectId,
) -> Result<CascadeOutcome, CascadeError>
where
    J: Collection<Job> + ?Sized,
    A: Collection<Application> + ?Sized,
{
    let exists = jobs
        .get(job_id)
        .map_err(|source| CascadeError::Children {
            job_id: *job_id,
            source,
        })?
        .is_some();
    if !exists {
        return Err(CascadeError::JobNotFound);
    }

    let dependents = Filter::default().with_equal("jobId", job_id.to_hex());
    let applications_removed =
        applications
            .delete_many(&dependents)
            .map_err(|source| CascadeError::Children {
                job_id: *job_id,
                source,
            })?;
    info!(%job_id, applications_removed, "cascade phase one complete");

    match jobs.delete(job_id) {
        Ok(Some(job)) => {
            info!(%job_id, "cascade phase two complete");
            Ok(CascadeOutcome {
                job,
                applications_removed,
            })
        }
        Ok(None) => Err(CascadeError::JobNotFound),
        Err(source) => {
            error!(
                %job_id,
                applications_removed,
                cascade_incomplete = true,
                error = %source,
                "job survived cascade delete; retry to finish"
            );
            Err(CascadeError::Parent {
                job_id: *job_id,
                applications_removed,
                source,
            })
        }
    }
}
