pub mod entities;
pub mod registry;

pub use entities::{Operation, OperationStatus};
pub use registry::{OperationRegistry, OperationStatistics};
