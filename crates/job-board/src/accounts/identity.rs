use std::sync::Arc;

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::domain::Role;
use super::token::TokenAuthority;
use crate::error::{parse_id, ServiceError};
use crate::store::ObjectId;

/// Caller identity recovered from a verified bearer token.
///
/// Handlers take this instead of trusting ids supplied in bodies or query
/// strings; the services then compare it against stored ownership fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: ObjectId,
    pub role: Role,
}

impl Identity {
    pub fn new(user_id: ObjectId, role: Role) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), ServiceError> {
        if roles.contains(&self.role) {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} accounts cannot perform this action",
                self.role.label()
            )))
        }
    }

    /// The user a listing is scoped to. A caller may name themself; naming
    /// anyone else requires the admin role.
    pub fn scope_for(&self, requested: Option<&str>, label: &str) -> Result<ObjectId, ServiceError> {
        let Some(raw) = requested else {
            return Ok(self.user_id);
        };
        let requested = parse_id(raw, label)?;
        if requested == self.user_id || self.is_admin() {
            Ok(requested)
        } else {
            Err(ServiceError::Forbidden(format!(
                "{label} does not match the authenticated user"
            )))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let authority = parts
            .extensions
            .get::<Arc<TokenAuthority>>()
            .cloned()
            .ok_or_else(|| ServiceError::Internal("token verification is not configured".into()))?;

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ServiceError::Unauthorized("Missing Authorization header".into()))?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServiceError::Unauthorized("Expected a Bearer token".into()))?;

        let claims = authority
            .verify(token)
            .map_err(|err| ServiceError::Unauthorized(err.to_string()))?;
        let user_id = ObjectId::parse(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("token subject is malformed".into()))?;

        Ok(Identity::new(user_id, claims.role))
    }
}
