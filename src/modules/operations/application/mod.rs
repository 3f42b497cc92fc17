pub mod coordinator;

pub use coordinator::{AddMembersOutcome, OperationCoordinator};
