use crate::modules::collection::domain::{Collection, CollectionPage, MembershipStore};
use crate::shared::application::PaginationParams;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use std::sync::Arc;
use uuid::Uuid;

pub struct CollectionService {
    store: Arc<dyn MembershipStore>,
    default_page_limit: u32,
}

impl CollectionService {
    pub fn new(store: Arc<dyn MembershipStore>, default_page_limit: u32) -> Self {
        Self {
            store,
            default_page_limit,
        }
    }

    pub fn default_page_limit(&self) -> u32 {
        self.default_page_limit
    }

    pub async fn get_all_collections(&self) -> AppResult<Vec<Collection>> {
        let collections = self.store.list_collections().await?;
        Ok(collections)
    }

    pub async fn get_collection(&self, id: &Uuid) -> AppResult<Collection> {
        self.store
            .find_collection(*id)
            .await?
            .ok_or_else(|| AppError::CollectionNotFound(format!("Collection with ID {} not found", id)))
    }

    pub async fn get_collection_page(
        &self,
        id: &Uuid,
        params: PaginationParams,
    ) -> AppResult<CollectionPage> {
        let collection = self.get_collection(id).await?;

        LogContext::store_operation("member_page", &collection.name, None);
        let (members, total_count) = self
            .store
            .member_page(collection.id, params.offset(), params.limit())
            .await?;

        Ok(CollectionPage {
            collection,
            members,
            total_count,
        })
    }
}
