/// Process-wide, in-memory operation registry
///
/// Created once at startup and shared by the coordinator (create/read) and the
/// bulk-add workers (mutation). Entries are never persisted and never evicted.
use super::entities::{Operation, OperationStatus};
use crate::shared::errors::{AppError, AppResult};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: Arc<DashMap<Uuid, Operation>>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending operation
    pub fn create(&self, operation_id: Uuid, total: usize) -> AppResult<Operation> {
        match self.operations.entry(operation_id) {
            Entry::Occupied(_) => Err(AppError::DuplicateOperation(format!(
                "Operation {} already exists",
                operation_id
            ))),
            Entry::Vacant(slot) => {
                let operation = Operation::new(operation_id, total);
                slot.insert(operation.clone());
                Ok(operation)
            }
        }
    }

    /// Consistent snapshot of an operation
    pub fn get(&self, operation_id: &Uuid) -> AppResult<Operation> {
        self.operations
            .get(operation_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::OperationNotFound(operation_id.to_string()))
    }

    /// Apply `mutator` to an operation atomically.
    ///
    /// The entry stays locked for the whole mutation and the change is staged
    /// on a copy: if the mutator fails or leaves the record violating its
    /// invariants, the stored operation is unchanged.
    pub fn update<F, R>(&self, operation_id: &Uuid, mutator: F) -> AppResult<R>
    where
        F: FnOnce(&mut Operation) -> AppResult<R>,
    {
        let mut entry = self
            .operations
            .get_mut(operation_id)
            .ok_or_else(|| AppError::OperationNotFound(operation_id.to_string()))?;

        let mut draft = entry.value().clone();
        let result = mutator(&mut draft)?;
        draft.validate()?;
        draft.updated_at = Utc::now();
        *entry = draft;

        Ok(result)
    }

    pub fn mark_in_progress(&self, operation_id: &Uuid, total: usize) -> AppResult<()> {
        self.update(operation_id, |op| op.start(total))
    }

    pub fn revise_total(&self, operation_id: &Uuid, total: usize) -> AppResult<()> {
        self.update(operation_id, |op| op.revise_total(total))
    }

    /// Returns (progress, total) after the increment
    pub fn increment_progress(&self, operation_id: &Uuid) -> AppResult<(usize, usize)> {
        self.update(operation_id, |op| {
            let progress = op.record_success()?;
            Ok((progress, op.total))
        })
    }

    pub fn mark_completed(&self, operation_id: &Uuid) -> AppResult<()> {
        self.update(operation_id, |op| op.complete())
    }

    pub fn mark_failed(&self, operation_id: &Uuid, message: impl Into<String>) -> AppResult<()> {
        let message = message.into();
        self.update(operation_id, move |op| op.fail(message))
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Counts by status, for monitoring
    pub fn statistics(&self) -> OperationStatistics {
        let mut stats = OperationStatistics::default();
        for entry in self.operations.iter() {
            match entry.status {
                OperationStatus::Pending => stats.pending_count += 1,
                OperationStatus::InProgress => stats.in_progress_count += 1,
                OperationStatus::Completed => stats.completed_count += 1,
                OperationStatus::Failed => stats.failed_count += 1,
            }
            stats.total_count += 1;
        }
        stats
    }
}

/// Operation registry statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationStatistics {
    pub pending_count: usize,
    pub in_progress_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    pub total_count: usize,
}
