use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::domain::{LoginRequest, ProfileUpdate, RegisterRequest, User};
use super::identity::Identity;
use super::service::AccountService;
use crate::error::ServiceError;
use crate::store::Collection;

/// Router builder exposing registration, login and the caller's own profile.
pub fn account_router<U>(service: Arc<AccountService<U>>) -> Router
where
    U: Collection<User> + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<U>))
        .route("/api/v1/auth/login", post(login_handler::<U>))
        .route(
            "/api/v1/users/me",
            get(profile_handler::<U>).patch(update_profile_handler::<U>),
        )
        .with_state(service)
}

pub(crate) async fn register_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Response, ServiceError>
where
    U: Collection<User> + 'static,
{
    let user = service.register(request)?;
    let payload = json!({
        "status": true,
        "message": "User registered successfully",
        "result": user,
    });
    Ok((StatusCode::CREATED, Json(payload)).into_response())
}

pub(crate) async fn login_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, ServiceError>
where
    U: Collection<User> + 'static,
{
    let session = service.login(request)?;
    Ok(Json(json!({
        "status": true,
        "message": "Login successful",
        "result": session.user,
        "token": session.token,
    })))
}

pub(crate) async fn profile_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    identity: Identity,
) -> Result<Json<serde_json::Value>, ServiceError>
where
    U: Collection<User> + 'static,
{
    let user = service.profile(&identity)?;
    Ok(Json(json!({ "status": true, "result": user })))
}

pub(crate) async fn update_profile_handler<U>(
    State(service): State<Arc<AccountService<U>>>,
    identity: Identity,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<serde_json::Value>, ServiceError>
where
    U: Collection<User> + 'static,
{
    let user = service.update_profile(&identity, update)?;
    Ok(Json(json!({
        "status": true,
        "message": "User updated successfully",
        "result": user,
    })))
}
