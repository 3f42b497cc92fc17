use crate::modules::collection::domain::{dedupe_member_ids, Collection, MemberId, MembershipStore};
use crate::modules::operations::dispatcher::OperationDispatcher;
use crate::modules::operations::domain::{Operation, OperationRegistry};
use crate::modules::operations::worker::BulkAddJob;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_error, log_info};
use std::sync::Arc;
use uuid::Uuid;

/// How many offending ids to echo back in an InvalidMembership message
const MAX_REPORTED_MEMBERS: usize = 10;

/// Result of a successful dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddMembersOutcome {
    pub operation_id: Uuid,
    pub message: String,
}

/// Request-time validation and dispatch. Never performs inserts itself.
pub struct OperationCoordinator {
    store: Arc<dyn MembershipStore>,
    registry: OperationRegistry,
    dispatcher: Arc<OperationDispatcher>,
}

impl OperationCoordinator {
    pub fn new(
        store: Arc<dyn MembershipStore>,
        registry: OperationRegistry,
        dispatcher: Arc<OperationDispatcher>,
    ) -> Self {
        Self {
            store,
            registry,
            dispatcher,
        }
    }

    /// Copy the given members of `source_id` into `target_id`.
    ///
    /// Every requested id must currently belong to the source; otherwise the
    /// whole request is rejected before any operation exists.
    pub async fn add_selected(
        &self,
        source_id: Uuid,
        target_id: Uuid,
        member_ids: Vec<MemberId>,
    ) -> AppResult<AddMembersOutcome> {
        let (source, target) = self.resolve_collections(source_id, target_id).await?;
        let requested = dedupe_member_ids(member_ids);

        if !requested.is_empty() {
            let in_source = self.store.members_present(source.id, &requested).await?;
            let missing: Vec<MemberId> = requested
                .iter()
                .copied()
                .filter(|id| !in_source.contains(id))
                .collect();

            if !missing.is_empty() {
                log_debug!(
                    "Rejecting add to {}: {} members not in source {}",
                    target.id,
                    missing.len(),
                    source.id
                );
                return Err(AppError::InvalidMembership(format!(
                    "{} of {} requested members are not in collection '{}': {:?}",
                    missing.len(),
                    requested.len(),
                    source.name,
                    &missing[..missing.len().min(MAX_REPORTED_MEMBERS)]
                )));
            }
        }

        let message = format!("Adding {} members to {}", requested.len(), target.name);
        let operation_id = self.submit(&source, &target, requested)?;

        Ok(AddMembersOutcome {
            operation_id,
            message,
        })
    }

    /// Copy every current member of `source_id` into `target_id`
    pub async fn add_all(&self, source_id: Uuid, target_id: Uuid) -> AppResult<AddMembersOutcome> {
        let (source, target) = self.resolve_collections(source_id, target_id).await?;
        let member_ids = self.store.member_ids(source.id).await?;

        let message = format!(
            "Adding all {} members from {} to {}",
            member_ids.len(),
            source.name,
            target.name
        );
        let operation_id = self.submit(&source, &target, member_ids)?;

        Ok(AddMembersOutcome {
            operation_id,
            message,
        })
    }

    pub fn get_status(&self, operation_id: &Uuid) -> AppResult<Operation> {
        self.registry.get(operation_id)
    }

    async fn resolve_collections(
        &self,
        source_id: Uuid,
        target_id: Uuid,
    ) -> AppResult<(Collection, Collection)> {
        let source = self.find_collection(source_id).await?;
        let target = self.find_collection(target_id).await?;
        Ok((source, target))
    }

    async fn find_collection(&self, id: Uuid) -> AppResult<Collection> {
        self.store
            .find_collection(id)
            .await?
            .ok_or_else(|| AppError::CollectionNotFound(format!("Collection with ID {} not found", id)))
    }

    /// Register a pending operation and queue it; returns without waiting
    fn submit(
        &self,
        source: &Collection,
        target: &Collection,
        member_ids: Vec<MemberId>,
    ) -> AppResult<Uuid> {
        let operation_id = Uuid::new_v4();
        self.registry.create(operation_id, member_ids.len())?;

        let job = BulkAddJob {
            operation_id,
            source_collection_id: source.id,
            target_collection_id: target.id,
            member_ids,
        };

        if let Err(e) = self.dispatcher.dispatch(job) {
            log_error!("Failed to dispatch operation {}: {}", operation_id, e);
            if let Err(update_err) = self.registry.mark_failed(&operation_id, e.to_string()) {
                log_error!("Operation {} left pending: {}", operation_id, update_err);
            }
            return Err(e);
        }

        log_info!(
            "Operation {} queued: {} -> {}",
            operation_id,
            source.name,
            target.name
        );
        Ok(operation_id)
    }
}
