use crate::config::ConfigError;
use crate::jobs::CascadeError;
use crate::query::{ListingError, QueryError};
use crate::store::{ObjectId, RepositoryError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;
use tracing::error;

/// Process-level failures surfaced by the binary.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Service(ServiceError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Service(err) => write!(f, "service error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Service(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<ServiceError> for AppError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

/// Error raised by the job, application, account and admin services.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    Internal(String),
    #[error("storage failure: {0}")]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) | ServiceError::Repository(RepositoryError::NotFound) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Conflict(_) | ServiceError::Repository(RepositoryError::Conflict) => {
                StatusCode::CONFLICT
            }
            ServiceError::Internal(_) | ServiceError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<ListingError> for ServiceError {
    fn from(value: ListingError) -> Self {
        match value {
            empty @ ListingError::Empty { .. } => Self::NotFound(empty.to_string()),
            ListingError::Repository(err) => Self::Repository(err),
        }
    }
}

impl From<CascadeError> for ServiceError {
    fn from(value: CascadeError) -> Self {
        match value {
            CascadeError::JobNotFound => Self::NotFound("Job not found".into()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<QueryError> for ServiceError {
    fn from(value: QueryError) -> Self {
        Self::Validation(value.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }

        let body = Json(json!({ "status": false, "message": self.to_string() }));
        (status, body).into_response()
    }
}

/// Parse a caller-supplied identifier, failing before any store access.
pub(crate) fn parse_id(raw: &str, label: &str) -> Result<ObjectId, ServiceError> {
    ObjectId::parse(raw).map_err(|_| ServiceError::Validation(format!("Valid {label} is required")))
}
