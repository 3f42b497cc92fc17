use crate::modules::collection::domain::StoreError;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Invalid membership: {0}")]
    InvalidMembership(String),

    #[error("Operation not found: {0}")]
    OperationNotFound(String),

    #[error("Duplicate operation: {0}")]
    DuplicateOperation(String),

    #[error("Invalid state transition: {0}")]
    InvalidStateTransition(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateMembership { .. } => AppError::DatabaseError(err.to_string()),
            StoreError::Persistence(message) => AppError::DatabaseError(message),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::DatabaseError(format!("Database pool error: {}", err))
    }
}

impl From<std::num::ParseIntError> for AppError {
    fn from(err: std::num::ParseIntError) -> Self {
        AppError::InvalidInput(format!("Invalid number: {}", err))
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn store_errors_become_database_errors() {
        let err: AppError = StoreError::Persistence("disk full".to_string()).into();
        assert_eq!(err, AppError::DatabaseError("disk full".to_string()));
        assert_eq!(err.to_string(), "Database error: disk full");

        let collection_id = Uuid::new_v4();
        let err: AppError = StoreError::DuplicateMembership {
            member_id: 7,
            collection_id,
        }
        .into();
        assert!(matches!(err, AppError::DatabaseError(ref m) if m.contains("member 7")));
    }

    #[test]
    fn unparseable_numbers_are_invalid_input() {
        let err: AppError = "many".parse::<usize>().unwrap_err().into();
        assert!(matches!(err, AppError::InvalidInput(ref m) if m.starts_with("Invalid number")));
    }

    #[test]
    fn app_error_serializes_with_type_tag() {
        let err = AppError::OperationNotFound("abc".to_string());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["type"], "OperationNotFound");
        assert_eq!(json["message"], "abc");
    }
}
