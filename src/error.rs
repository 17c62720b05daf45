//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Failures reported by an [`crate::store::EntityStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("unique constraint violated on {field}")]
    UniqueViolation { field: &'static str },
    #[error("foreign key violated: {0}")]
    ForeignKeyViolation(String),
    #[error("database: {0}")]
    Db(sqlx::Error),
}

/// Classify a sqlx error by the constraint it tripped, falling back to `Db`.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            if db_err.is_unique_violation() {
                return StoreError::UniqueViolation {
                    field: unique_field_for_constraint(&constraint),
                };
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::ForeignKeyViolation(constraint);
            }
        }
        StoreError::Db(err)
    }
}

fn unique_field_for_constraint(constraint: &str) -> &'static str {
    if constraint.ends_with("_username_key") {
        "username"
    } else if constraint.ends_with("_email_key") {
        "email"
    } else {
        "name"
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingField(Vec<&'static str>),
    #[error("{0}")]
    Duplicate(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("request body too large")]
    PayloadTooLarge,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("internal: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_) | AppError::Duplicate(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Store(StoreError::UniqueViolation { .. }) => StatusCode::BAD_REQUEST,
            AppError::Store(StoreError::ForeignKeyViolation(_)) => StatusCode::NOT_FOUND,
            AppError::Store(StoreError::Db(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to return to clients. Persistence and internal details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Store(StoreError::UniqueViolation { field }) => {
                format!("{} already exists", field)
            }
            AppError::Store(StoreError::ForeignKeyViolation(_)) => {
                "referenced resource not found".to_string()
            }
            AppError::Store(StoreError::Db(_)) | AppError::Internal(_) => {
                "internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "request rejected");
        }
        let body = ErrorBody {
            error: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}
