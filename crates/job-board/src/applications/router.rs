use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{Application, ApplicationSubmission, StatusUpdate};
use super::service::ApplicationService;
use crate::accounts::Identity;
use crate::error::ServiceError;
use crate::jobs::Job;
use crate::store::Collection;

/// Router builder exposing applying, reviewing and both sides' listings.
pub fn application_router<J, A>(service: Arc<ApplicationService<J, A>>) -> Router
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    Router::new()
        .route(
            "/api/v1/application/recruiter-jobs",
            get(recruiter_jobs_handler::<J, A>),
        )
        .route(
            "/api/v1/application/applicant-jobs",
            get(applicant_jobs_handler::<J, A>),
        )
        .route("/api/v1/application/apply", post(apply_handler::<J, A>))
        .route("/api/v1/application/:id", patch(status_handler::<J, A>))
        .with_state(service)
}

pub(crate) async fn apply_handler<J, A>(
    State(service): State<Arc<ApplicationService<J, A>>>,
    identity: Identity,
    Json(submission): Json<ApplicationSubmission>,
) -> Result<Response, ServiceError>
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let application = service.apply_to_job(&identity, submission)?;
    let payload = json!({
        "status": true,
        "message": "Applied Successfully",
        "result": application,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn status_handler<J, A>(
    State(service): State<Arc<ApplicationService<J, A>>>,
    identity: Identity,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<Value>, ServiceError>
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let application = service.update_status(&identity, &id, &update.status)?;
    Ok(Json(json!({
        "status": true,
        "message": "Application status updated",
        "result": application,
    })))
}

pub(crate) async fn applicant_jobs_handler<J, A>(
    State(service): State<Arc<ApplicationService<J, A>>>,
    identity: Identity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError>
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let page = service.applicant_jobs(&identity, &params)?;
    Ok(Json(json!({
        "status": true,
        "result": page.result,
        "totalJobs": page.total_count,
        "currentPage": page.current_page,
        "pageCount": page.page_count.max(1),
    })))
}

pub(crate) async fn recruiter_jobs_handler<J, A>(
    State(service): State<Arc<ApplicationService<J, A>>>,
    identity: Identity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError>
where
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let received = service.recruiter_jobs(&identity, params.get("recruiterId").map(String::as_str))?;
    Ok(Json(json!({
        "status": true,
        "totalJobs": received.len(),
        "result": received,
    })))
}
