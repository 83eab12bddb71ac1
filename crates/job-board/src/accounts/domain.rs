use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Document, ObjectId};

/// Account roles. Registration never grants `Admin` on request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Recruiter,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Recruiter => "recruiter",
            Role::Admin => "admin",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "user" => Some(Role::User),
            "recruiter" => Some(Role::Recruiter),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Stored account. The password hash is never serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: ObjectId,
    #[serde(rename = "FullName")]
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub location: String,
    pub resume: String,
    pub gender: String,
    pub created_at: DateTime<Utc>,
}

impl Document for User {
    const KIND: &'static str = "User";

    fn id(&self) -> ObjectId {
        self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    #[serde(rename = "FullName", default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login result: the account plus a bearer token for later requests.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
}

/// Self-service profile edits. Role and email are not editable here.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(rename = "FullName")]
    pub full_name: Option<String>,
    pub location: Option<String>,
    pub gender: Option<String>,
    pub resume: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RoleChange {
    pub id: String,
    pub role: String,
}
