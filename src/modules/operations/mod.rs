pub mod application;
pub mod commands;
pub mod dispatcher;
pub mod domain;
pub mod worker;

// Re-exports for easy external access
pub use application::{AddMembersOutcome, OperationCoordinator};
pub use dispatcher::OperationDispatcher;
pub use domain::{Operation, OperationRegistry, OperationStatistics, OperationStatus};
pub use worker::{BulkAddJob, BulkAddSummary, BulkAddWorker};
