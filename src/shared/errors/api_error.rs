use super::app_error::AppError;
use serde::Serialize;
use thiserror::Error;

/// Error shape returned across the command boundary.
///
/// Carries an HTTP-equivalent status so any transport can surface it
/// without knowing the domain error taxonomy.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ApiError {
    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::NotFound { .. } => 404,
            ApiError::BadRequest { .. } => 400,
            ApiError::Conflict { .. } => 409,
            ApiError::Internal { .. } => 500,
        }
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::CollectionNotFound(_) => ApiError::NotFound {
                resource: "Collection not found".to_string(),
            },
            AppError::OperationNotFound(_) => ApiError::NotFound {
                resource: "Operation not found".to_string(),
            },
            AppError::InvalidMembership(message)
            | AppError::InvalidInput(message)
            | AppError::ValidationError(message) => ApiError::BadRequest { message },
            AppError::DuplicateOperation(message) | AppError::InvalidStateTransition(message) => {
                ApiError::Conflict { message }
            }
            other => ApiError::Internal {
                message: other.to_string(),
            },
        }
    }
}
