use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};

use super::domain::{Job, JobDraft, JobPatch};
use super::service::JobService;
use crate::accounts::{Identity, User};
use crate::applications::Application;
use crate::error::ServiceError;
use crate::store::Collection;

/// Router builder exposing the job listing and recruiter job management.
pub fn job_router<U, J, A>(service: Arc<JobService<U, J, A>>) -> Router
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    Router::new()
        .route(
            "/api/v1/jobs",
            get(list_handler::<U, J, A>).post(create_handler::<U, J, A>),
        )
        .route("/api/v1/jobs/my-jobs", get(my_jobs_handler::<U, J, A>))
        .route(
            "/api/v1/jobs/:id",
            get(get_handler::<U, J, A>)
                .patch(update_handler::<U, J, A>)
                .delete(delete_handler::<U, J, A>),
        )
        .with_state(service)
}

pub(crate) async fn list_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let page = service.list(&params)?;
    Ok(Json(json!({
        "status": true,
        "result": page.result,
        "totalJobs": page.total_count,
        "currentPage": page.current_page,
        "pageCount": page.page_count,
    })))
}

pub(crate) async fn my_jobs_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    identity: Identity,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let jobs = service.my_jobs(&identity, params.get("recruiterId").map(String::as_str))?;
    Ok(Json(json!({ "status": true, "result": jobs })))
}

pub(crate) async fn get_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let job = service.get(&id)?;
    Ok(Json(json!({ "status": true, "result": job })))
}

pub(crate) async fn create_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    identity: Identity,
    Json(draft): Json<JobDraft>,
) -> Result<Response, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let job = service.create(&identity, draft)?;
    let payload = json!({
        "status": true,
        "message": "Job added successfully",
        "result": job,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn update_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    identity: Identity,
    Path(id): Path<String>,
    Json(patch): Json<JobPatch>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let job = service.update(&identity, &id, patch)?;
    Ok(Json(json!({
        "status": true,
        "message": "Job updated successfully",
        "result": job,
    })))
}

pub(crate) async fn delete_handler<U, J, A>(
    State(service): State<Arc<JobService<U, J, A>>>,
    identity: Identity,
    Path(id): Path<String>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let outcome = service.delete(&identity, &id)?;
    Ok(Json(json!({
        "status": true,
        "message": "Job deleted successfully",
        "result": outcome.job,
        "applicationsRemoved": outcome.applications_removed,
    })))
}
