use super::application::service::CollectionService;
use super::domain::Member;
use crate::shared::application::PaginationParams;
use crate::shared::errors::ApiError;

use crate::{log_debug, log_error};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCollectionPageRequest {
    pub collection_id: Uuid,
    #[serde(default)]
    pub offset: Option<u32>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionMetadataResponse {
    pub id: Uuid,
    pub collection_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPageResponse {
    pub id: Uuid,
    pub collection_name: String,
    pub members: Vec<Member>,
    pub total: i64,
}

pub async fn get_all_collection_metadata(
    collection_service: &CollectionService,
) -> Result<Vec<CollectionMetadataResponse>, ApiError> {
    let collections = collection_service
        .get_all_collections()
        .await
        .map_err(ApiError::from)?;

    Ok(collections
        .into_iter()
        .map(|c| CollectionMetadataResponse {
            id: c.id,
            collection_name: c.name,
        })
        .collect())
}

pub async fn get_collection_page(
    request: GetCollectionPageRequest,
    collection_service: &CollectionService,
) -> Result<CollectionPageResponse, ApiError> {
    let params = PaginationParams::from_request(
        request.offset,
        request.limit,
        collection_service.default_page_limit(),
    );
    log_debug!(
        "get_collection_page command called - collection: {}, offset: {}, limit: {}",
        request.collection_id,
        params.offset,
        params.limit
    );

    let page = collection_service
        .get_collection_page(&request.collection_id, params)
        .await
        .map_err(|e| {
            log_error!("Failed to load collection {}: {}", request.collection_id, e);
            ApiError::from(e)
        })?;

    Ok(CollectionPageResponse {
        id: page.collection.id,
        collection_name: page.collection.name,
        members: page.members,
        total: page.total_count,
    })
}
