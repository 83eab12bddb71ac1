use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{LoginRequest, ProfileUpdate, RegisterRequest, Role, RoleChange, Session, User};
use super::identity::Identity;
use super::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use super::token::TokenAuthority;
use crate::error::{parse_id, ServiceError};
use crate::query::{Filter, SortOrder, Window};
use crate::store::{Collection, ObjectId, RepositoryError};

/// Registration, login, and profile upkeep.
pub struct AccountService<U> {
    users: Arc<U>,
    tokens: Arc<TokenAuthority>,
    admin_email: String,
}

impl<U> AccountService<U>
where
    U: Collection<User> + 'static,
{
    pub fn new(users: Arc<U>, tokens: Arc<TokenAuthority>, admin_email: impl Into<String>) -> Self {
        Self {
            users,
            tokens,
            admin_email: admin_email.into().trim().to_lowercase(),
        }
    }

    pub fn tokens(&self) -> Arc<TokenAuthority> {
        Arc::clone(&self.tokens)
    }

    pub fn register(&self, request: RegisterRequest) -> Result<User, ServiceError> {
        let full_name = request.full_name.trim().to_string();
        if full_name.is_empty() {
            return Err(ServiceError::Validation("FullName is required".into()));
        }
        let email = normalize_email(&request.email)?;
        if request.password.trim().is_empty() {
            return Err(ServiceError::Validation("Password is required".into()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ServiceError::Validation(format!(
                "Password is too short (min {MIN_PASSWORD_LEN})"
            )));
        }

        let role = if email == self.admin_email {
            Role::Admin
        } else if request.role.as_deref().and_then(Role::parse) == Some(Role::Recruiter) {
            Role::Recruiter
        } else {
            Role::User
        };

        let password_hash = hash_password(&request.password)
            .map_err(|err| ServiceError::Internal(format!("password hashing failed: {err}")))?;

        let user = User {
            id: ObjectId::new(),
            full_name,
            email,
            password_hash,
            role,
            location: request.location.unwrap_or_default().trim().to_string(),
            resume: String::new(),
            gender: request.gender.unwrap_or_default().trim().to_string(),
            created_at: Utc::now(),
        };

        let unique_email = Filter::default().with_equal("email", user.email.as_str());
        let stored = match self.users.insert_unique(user, &unique_email) {
            Err(RepositoryError::Conflict) => {
                return Err(ServiceError::Conflict("Email Already exists".into()))
            }
            other => other?,
        };
        info!(user_id = %stored.id, role = stored.role.label(), "user registered");
        Ok(stored)
    }

    pub fn login(&self, request: LoginRequest) -> Result<Session, ServiceError> {
        let email = normalize_email(&request.email)?;
        if request.password.trim().is_empty() {
            return Err(ServiceError::Validation("Password is required".into()));
        }

        let user = self
            .find_by_email(&email)?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;

        if !verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "rejected login with invalid credentials");
            return Err(ServiceError::Unauthorized("Invalid credentials".into()));
        }

        let token = self
            .tokens
            .issue(&user)
            .map_err(|err| ServiceError::Internal(err.to_string()))?;
        Ok(Session { user, token })
    }

    pub fn profile(&self, identity: &Identity) -> Result<User, ServiceError> {
        self.users
            .get(&identity.user_id)?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))
    }

    pub fn update_profile(
        &self,
        identity: &Identity,
        update: ProfileUpdate,
    ) -> Result<User, ServiceError> {
        let mut user = self.profile(identity)?;

        if let Some(full_name) = update.full_name {
            let full_name = full_name.trim().to_string();
            if full_name.is_empty() {
                return Err(ServiceError::Validation("FullName cannot be empty".into()));
            }
            user.full_name = full_name;
        }
        if let Some(location) = update.location {
            user.location = location.trim().to_string();
        }
        if let Some(gender) = update.gender {
            user.gender = gender.trim().to_string();
        }
        if let Some(resume) = update.resume {
            user.resume = resume.trim().to_string();
        }

        Ok(self.users.replace(user)?)
    }

    /// Admin-only role assignment. Admins cannot demote themselves, so the
    /// board always keeps the admin who made the change.
    pub fn change_role(&self, identity: &Identity, change: RoleChange) -> Result<User, ServiceError> {
        identity.require_any(&[Role::Admin])?;
        let target = parse_id(&change.id, "user ID")?;
        let role = Role::parse(&change.role).ok_or_else(|| {
            ServiceError::Validation("role must be one of user, recruiter, admin".into())
        })?;
        if target == identity.user_id && role != Role::Admin {
            return Err(ServiceError::Validation("admins cannot demote themselves".into()));
        }

        let mut user = self
            .users
            .get(&target)?
            .ok_or_else(|| ServiceError::NotFound("User not found".into()))?;
        let previous = user.role;
        user.role = role;
        let updated = self.users.replace(user)?;

        info!(
            user_id = %updated.id,
            from = previous.label(),
            to = updated.role.label(),
            changed_by = %identity.user_id,
            "user role changed"
        );
        Ok(updated)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let filter = Filter::default().with_equal("email", email);
        let window = Window {
            skip: 0,
            limit: Some(1),
        };
        Ok(self.users.find(&filter, SortOrder::Oldest, window)?.pop())
    }
}

fn normalize_email(raw: &str) -> Result<String, ServiceError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(ServiceError::Validation("Email is required".into()));
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(ServiceError::Validation("Invalid email".into()))
    }
}
