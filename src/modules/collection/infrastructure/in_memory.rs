/// In-process implementation of MembershipStore
///
/// Backs the demo binary and the test suites. Supports an artificial
/// per-insert delay and injected insert failures so progress polling and
/// fatal-error paths can be exercised deterministically.
use crate::log_debug;
use crate::modules::collection::domain::{
    Collection, Member, MemberId, MembershipSession, MembershipStore, StoreError, StoreResult,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Default)]
struct StoreState {
    collections: Vec<Collection>,
    members: BTreeMap<MemberId, Member>,
    memberships: BTreeSet<(Uuid, MemberId)>,
    /// member id -> error returned by any insert of that member
    insert_failures: HashMap<MemberId, String>,
}

impl StoreState {
    fn has_collection(&self, id: Uuid) -> bool {
        self.collections.iter().any(|c| c.id == id)
    }

    fn present(&self, collection_id: Uuid, member_ids: &[MemberId]) -> HashSet<MemberId> {
        member_ids
            .iter()
            .copied()
            .filter(|id| self.memberships.contains(&(collection_id, *id)))
            .collect()
    }

    fn ordered_member_ids(&self, collection_id: Uuid) -> Vec<MemberId> {
        self.memberships
            .range((collection_id, MemberId::MIN)..=(collection_id, MemberId::MAX))
            .map(|(_, member_id)| *member_id)
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipStore {
    state: Arc<RwLock<StoreState>>,
    insert_delay: Option<Duration>,
    open_sessions: Arc<AtomicUsize>,
}

impl InMemoryMembershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep before every session insert, simulating a slow commit
    pub fn with_insert_delay(mut self, delay: Duration) -> Self {
        self.insert_delay = Some(delay);
        self
    }

    pub async fn add_collection(&self, name: &str) -> Collection {
        let collection = Collection::new(name);
        self.state.write().await.collections.push(collection.clone());
        collection
    }

    pub async fn add_member(&self, member: Member) {
        self.state.write().await.members.insert(member.id, member);
    }

    /// Seed a membership directly, bypassing sessions
    pub async fn add_membership(&self, member_id: MemberId, collection_id: Uuid) -> StoreResult<()> {
        let mut state = self.state.write().await;
        Self::insert_locked(&mut state, member_id, collection_id)
    }

    /// Make every later insert of `member_id` fail with a non-duplicate error
    pub async fn fail_inserts_for(&self, member_id: MemberId, message: &str) {
        self.state
            .write()
            .await
            .insert_failures
            .insert(member_id, message.to_string());
    }

    /// Number of sessions handed out and not yet dropped
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    pub async fn member_ids_of(&self, collection_id: Uuid) -> Vec<MemberId> {
        self.state.read().await.ordered_member_ids(collection_id)
    }

    fn insert_locked(
        state: &mut StoreState,
        member_id: MemberId,
        collection_id: Uuid,
    ) -> StoreResult<()> {
        if !state.has_collection(collection_id) {
            return Err(StoreError::Persistence(format!(
                "foreign key violation: collection {} does not exist",
                collection_id
            )));
        }
        if !state.members.contains_key(&member_id) {
            return Err(StoreError::Persistence(format!(
                "foreign key violation: member {} does not exist",
                member_id
            )));
        }
        if !state.memberships.insert((collection_id, member_id)) {
            return Err(StoreError::DuplicateMembership {
                member_id,
                collection_id,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl MembershipStore for InMemoryMembershipStore {
    async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        let mut collections = self.state.read().await.collections.clone();
        collections.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(collections)
    }

    async fn find_collection(&self, id: Uuid) -> StoreResult<Option<Collection>> {
        Ok(self
            .state
            .read()
            .await
            .collections
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn member_page(
        &self,
        collection_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Member>, i64)> {
        let state = self.state.read().await;
        let ids = state.ordered_member_ids(collection_id);
        let total = ids.len() as i64;

        let members = ids
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .filter_map(|id| state.members.get(&id).cloned())
            .collect();

        Ok((members, total))
    }

    async fn member_ids(&self, collection_id: Uuid) -> StoreResult<Vec<MemberId>> {
        Ok(self.state.read().await.ordered_member_ids(collection_id))
    }

    async fn members_present(
        &self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>> {
        Ok(self.state.read().await.present(collection_id, member_ids))
    }

    async fn open_session(&self) -> StoreResult<Box<dyn MembershipSession>> {
        let open = self.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        log_debug!("In-memory session opened ({} open)", open);

        Ok(Box::new(InMemorySession {
            state: Arc::clone(&self.state),
            insert_delay: self.insert_delay,
            open_sessions: Arc::clone(&self.open_sessions),
        }))
    }
}

pub struct InMemorySession {
    state: Arc<RwLock<StoreState>>,
    insert_delay: Option<Duration>,
    open_sessions: Arc<AtomicUsize>,
}

#[async_trait]
impl MembershipSession for InMemorySession {
    async fn members_present(
        &mut self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>> {
        Ok(self.state.read().await.present(collection_id, member_ids))
    }

    async fn insert_membership(
        &mut self,
        member_id: MemberId,
        collection_id: Uuid,
    ) -> StoreResult<()> {
        if let Some(delay) = self.insert_delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.write().await;
        if let Some(message) = state.insert_failures.get(&member_id) {
            return Err(StoreError::Persistence(message.clone()));
        }
        InMemoryMembershipStore::insert_locked(&mut state, member_id, collection_id)
    }
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        let open = self.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        log_debug!("In-memory session released ({} open)", open);
    }
}
