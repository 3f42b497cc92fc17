/// Domain entities for bulk-add operations
///
/// An operation is one asynchronous bulk-add request's tracked lifecycle.
/// Its status only moves forward: pending -> in_progress -> completed | failed.
use crate::shared::errors::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Operation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl OperationStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OperationStatus::Completed | OperationStatus::Failed)
    }

    pub fn can_transition_to(&self, next: OperationStatus) -> bool {
        use OperationStatus::*;
        matches!(
            (self, next),
            (Pending, InProgress) | (Pending, Failed) | (InProgress, Completed) | (InProgress, Failed)
        )
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OperationStatus::Pending => write!(f, "pending"),
            OperationStatus::InProgress => write!(f, "in_progress"),
            OperationStatus::Completed => write!(f, "completed"),
            OperationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for OperationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(OperationStatus::Pending),
            "in_progress" => Ok(OperationStatus::InProgress),
            "completed" => Ok(OperationStatus::Completed),
            "failed" => Ok(OperationStatus::Failed),
            _ => Err(format!("Invalid operation status: {}", s)),
        }
    }
}

/// Snapshot of one tracked operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_id: Uuid,
    pub status: OperationStatus,
    /// Members successfully inserted so far
    pub progress: usize,
    /// Members this operation will attempt
    pub total: usize,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Operation {
    pub fn new(operation_id: Uuid, total: usize) -> Self {
        let now = Utc::now();
        Self {
            operation_id,
            status: OperationStatus::Pending,
            progress: 0,
            total,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// pending -> in_progress, recording the requested member count
    pub fn start(&mut self, total: usize) -> AppResult<()> {
        self.transition(OperationStatus::InProgress)?;
        self.total = total;
        Ok(())
    }

    /// Shrink `total` to the real working set. Only allowed before any progress.
    pub fn revise_total(&mut self, total: usize) -> AppResult<()> {
        if self.status != OperationStatus::InProgress {
            return Err(self.rejected(format!("cannot revise total while {}", self.status)));
        }
        if self.progress > 0 {
            return Err(self.rejected("total is fixed once progress has started".to_string()));
        }
        if total > self.total {
            return Err(self.rejected(format!(
                "total can only shrink ({} -> {})",
                self.total, total
            )));
        }
        self.total = total;
        Ok(())
    }

    /// Count one successful insert, returning the new progress
    pub fn record_success(&mut self) -> AppResult<usize> {
        if self.status != OperationStatus::InProgress {
            return Err(self.rejected(format!("cannot advance progress while {}", self.status)));
        }
        if self.progress >= self.total {
            return Err(self.rejected(format!(
                "progress would exceed total ({})",
                self.total
            )));
        }
        self.progress += 1;
        Ok(self.progress)
    }

    pub fn complete(&mut self) -> AppResult<()> {
        self.transition(OperationStatus::Completed)
    }

    pub fn fail(&mut self, message: impl Into<String>) -> AppResult<()> {
        self.transition(OperationStatus::Failed)?;
        let message = message.into();
        self.error_message = Some(if message.trim().is_empty() {
            "unknown error".to_string()
        } else {
            message
        });
        Ok(())
    }

    /// Invariants every stored record must satisfy
    pub fn validate(&self) -> AppResult<()> {
        if self.progress > self.total {
            return Err(self.rejected(format!(
                "progress {} exceeds total {}",
                self.progress, self.total
            )));
        }
        if self.error_message.is_some() != (self.status == OperationStatus::Failed) {
            return Err(self.rejected(
                "error message must be present exactly when failed".to_string(),
            ));
        }
        Ok(())
    }

    fn transition(&mut self, next: OperationStatus) -> AppResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(self.rejected(format!("{} -> {}", self.status, next)));
        }
        self.status = next;
        Ok(())
    }

    fn rejected(&self, reason: String) -> AppError {
        AppError::InvalidStateTransition(format!("operation {}: {}", self.operation_id, reason))
    }
}
