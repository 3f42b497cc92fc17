/// Persistence port for collections and their memberships
///
/// Implementations must report a violated (member, collection) uniqueness
/// constraint as `StoreError::DuplicateMembership` so callers never have to
/// inspect error text.
use crate::modules::collection::domain::entities::collection::{Collection, Member, MemberId};
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("member {member_id} already belongs to collection {collection_id}")]
    DuplicateMembership {
        member_id: MemberId,
        collection_id: Uuid,
    },

    #[error("{0}")]
    Persistence(String),
}

impl StoreError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, StoreError::DuplicateMembership { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipStore: Send + Sync {
    /// All collections, ordered by name (ties broken by id)
    async fn list_collections(&self) -> StoreResult<Vec<Collection>>;

    /// Look up a collection by id
    async fn find_collection(&self, id: Uuid) -> StoreResult<Option<Collection>>;

    /// Members of a collection ordered by member id, plus the total member count
    async fn member_page(
        &self,
        collection_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Member>, i64)>;

    /// Every member id of a collection, ordered by member id
    async fn member_ids(&self, collection_id: Uuid) -> StoreResult<Vec<MemberId>>;

    /// Which of `member_ids` already belong to the collection
    async fn members_present(
        &self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>>;

    /// Acquire a session held exclusively by one bulk-add worker.
    /// Its resources are released when the session is dropped.
    async fn open_session(&self) -> StoreResult<Box<dyn MembershipSession>>;
}

/// Exclusive unit of store access; every insert is its own commit point
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipSession: Send {
    async fn members_present(
        &mut self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>>;

    async fn insert_membership(
        &mut self,
        member_id: MemberId,
        collection_id: Uuid,
    ) -> StoreResult<()>;
}
