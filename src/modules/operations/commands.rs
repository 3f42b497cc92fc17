use super::application::OperationCoordinator;
use super::domain::{Operation, OperationStatus};
use crate::modules::collection::domain::MemberId;
use crate::shared::errors::{ApiError, AppError};

use crate::{log_debug, log_error, log_info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMembersRequest {
    pub source_collection_id: Uuid,
    pub target_collection_id: Uuid,
    pub member_ids: Vec<MemberId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddAllMembersRequest {
    pub source_collection_id: Uuid,
    pub target_collection_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetOperationStatusRequest {
    /// Kept as text so malformed ids surface as "not found"
    pub operation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMembersResponse {
    pub operation_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatusResponse {
    pub operation_id: String,
    pub status: OperationStatus,
    pub progress: usize,
    pub total: usize,
    pub error_message: Option<String>,
}

impl From<Operation> for OperationStatusResponse {
    fn from(op: Operation) -> Self {
        Self {
            operation_id: op.operation_id.to_string(),
            status: op.status,
            progress: op.progress,
            total: op.total,
            error_message: op.error_message,
        }
    }
}

pub async fn add_members_to_collection(
    request: AddMembersRequest,
    coordinator: &OperationCoordinator,
) -> Result<AddMembersResponse, ApiError> {
    log_info!(
        "add_members_to_collection command called - {} members: {} -> {}",
        request.member_ids.len(),
        request.source_collection_id,
        request.target_collection_id
    );

    let outcome = coordinator
        .add_selected(
            request.source_collection_id,
            request.target_collection_id,
            request.member_ids,
        )
        .await
        .map_err(|e| {
            log_error!("Failed to start bulk add: {}", e);
            ApiError::from(e)
        })?;

    Ok(AddMembersResponse {
        operation_id: outcome.operation_id.to_string(),
        message: outcome.message,
    })
}

pub async fn add_all_members_to_collection(
    request: AddAllMembersRequest,
    coordinator: &OperationCoordinator,
) -> Result<AddMembersResponse, ApiError> {
    log_info!(
        "add_all_members_to_collection command called - {} -> {}",
        request.source_collection_id,
        request.target_collection_id
    );

    let outcome = coordinator
        .add_all(request.source_collection_id, request.target_collection_id)
        .await
        .map_err(|e| {
            log_error!("Failed to start bulk add of all members: {}", e);
            ApiError::from(e)
        })?;

    Ok(AddMembersResponse {
        operation_id: outcome.operation_id.to_string(),
        message: outcome.message,
    })
}

pub async fn get_operation_status(
    request: GetOperationStatusRequest,
    coordinator: &OperationCoordinator,
) -> Result<OperationStatusResponse, ApiError> {
    log_debug!(
        "get_operation_status command called - operation: {}",
        request.operation_id
    );

    let operation_id = Uuid::parse_str(request.operation_id.trim())
        .map_err(|_| ApiError::from(AppError::OperationNotFound(request.operation_id.clone())))?;

    let operation = coordinator
        .get_status(&operation_id)
        .map_err(ApiError::from)?;

    Ok(operation.into())
}
