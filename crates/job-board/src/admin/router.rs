use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};

use super::service::AdminService;
use crate::accounts::{Identity, RoleChange, User};
use crate::applications::Application;
use crate::error::ServiceError;
use crate::jobs::Job;
use crate::store::Collection;

pub fn admin_router<U, J, A>(service: Arc<AdminService<U, J, A>>) -> Router
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    Router::new()
        .route("/api/v1/admin/info", get(info_handler::<U, J, A>))
        .route("/api/v1/admin/stats", get(stats_handler::<U, J, A>))
        .route(
            "/api/v1/admin/update-role",
            patch(update_role_handler::<U, J, A>),
        )
        .with_state(service)
}

async fn info_handler<U, J, A>(
    State(service): State<Arc<AdminService<U, J, A>>>,
    identity: Identity,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let info = service.info(&identity)?;
    Ok(Json(json!({ "status": true, "result": info })))
}

async fn stats_handler<U, J, A>(
    State(service): State<Arc<AdminService<U, J, A>>>,
    identity: Identity,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let stats = service.monthly_stats(&identity)?;
    Ok(Json(json!({ "status": true, "result": stats })))
}

async fn update_role_handler<U, J, A>(
    State(service): State<Arc<AdminService<U, J, A>>>,
    identity: Identity,
    Json(change): Json<RoleChange>,
) -> Result<Json<Value>, ServiceError>
where
    U: Collection<User> + 'static,
    J: Collection<Job> + 'static,
    A: Collection<Application> + 'static,
{
    let user = service.update_role(&identity, change)?;
    Ok(Json(json!({
        "status": true,
        "message": "Role updated successfully",
        "result": user,
    })))
}
