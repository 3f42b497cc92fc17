/// Bulk-add worker
///
/// Executes one bulk-add operation end to end: filters members already in the
/// target, then inserts the rest one record at a time, publishing progress to
/// the registry after every successful insert. Each insert is its own commit,
/// so one bad record never poisons the batch and pollers see steady progress.
use crate::modules::collection::domain::{MemberId, MembershipStore, StoreError};
use crate::modules::operations::domain::OperationRegistry;
use crate::shared::errors::AppResult;
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_debug, log_error, log_info, log_warn};
use std::sync::Arc;
use uuid::Uuid;

/// One unit of queued work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAddJob {
    pub operation_id: Uuid,
    pub source_collection_id: Uuid,
    pub target_collection_id: Uuid,
    /// Requested members in processing order
    pub member_ids: Vec<MemberId>,
}

/// What happened while processing a job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkAddSummary {
    pub requested: usize,
    pub already_present: usize,
    pub inserted: usize,
    pub skipped_duplicates: usize,
}

pub struct BulkAddWorker {
    store: Arc<dyn MembershipStore>,
    registry: OperationRegistry,
}

impl BulkAddWorker {
    pub fn new(store: Arc<dyn MembershipStore>, registry: OperationRegistry) -> Self {
        Self { store, registry }
    }

    /// Run a job to a terminal state.
    ///
    /// Never returns an error: failures are recorded on the operation. If even
    /// that update fails the operation is left visibly stuck and logged.
    pub async fn run(&self, job: BulkAddJob) {
        let operation_id = job.operation_id;
        let timer = TimedOperation::new(&format!("bulk_add {}", operation_id));

        match self.execute(&job).await {
            Ok(summary) => {
                if let Err(e) = self.registry.mark_completed(&operation_id) {
                    log_error!("Operation {} finished but could not be completed: {}", operation_id, e);
                    return;
                }
                timer.finish_with_info(&format!(
                    "inserted {}, already present {}, skipped duplicates {}",
                    summary.inserted, summary.already_present, summary.skipped_duplicates
                ));
                log_info!(
                    "Operation {} completed: {} of {} requested members added to {}",
                    operation_id,
                    summary.inserted,
                    summary.requested,
                    job.target_collection_id
                );
            }
            Err(e) => {
                timer.finish();
                log_warn!("Operation {} failed: {}", operation_id, e);
                if let Err(update_err) = self.registry.mark_failed(&operation_id, e.to_string()) {
                    log_error!(
                        "Operation {} could not be marked failed ({}); it will remain in its last state",
                        operation_id,
                        update_err
                    );
                }
            }
        }
    }

    /// The store session lives only inside this call, so it is released on
    /// every exit path.
    async fn execute(&self, job: &BulkAddJob) -> AppResult<BulkAddSummary> {
        let operation_id = job.operation_id;
        let target = job.target_collection_id;

        self.registry
            .mark_in_progress(&operation_id, job.member_ids.len())?;
        log_info!(
            "Operation {} started: copying {} members from {} to {}",
            operation_id,
            job.member_ids.len(),
            job.source_collection_id,
            target
        );

        let mut session = self.store.open_session().await?;

        let present = session.members_present(target, &job.member_ids).await?;
        let working_set: Vec<MemberId> = job
            .member_ids
            .iter()
            .copied()
            .filter(|id| !present.contains(id))
            .collect();

        self.registry.revise_total(&operation_id, working_set.len())?;
        log_debug!(
            "Operation {}: {} already in target, {} to insert",
            operation_id,
            present.len(),
            working_set.len()
        );

        let mut summary = BulkAddSummary {
            requested: job.member_ids.len(),
            already_present: job.member_ids.len() - working_set.len(),
            ..BulkAddSummary::default()
        };

        for member_id in working_set {
            match session.insert_membership(member_id, target).await {
                Ok(()) => {
                    let (progress, total) = self.registry.increment_progress(&operation_id)?;
                    summary.inserted += 1;
                    LogContext::operation_progress(&operation_id.to_string(), progress, total);
                }
                Err(StoreError::DuplicateMembership { .. }) => {
                    log_debug!(
                        "Operation {}: member {} appeared in {} concurrently, skipping",
                        operation_id,
                        member_id,
                        target
                    );
                    summary.skipped_duplicates += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(summary)
    }
}
