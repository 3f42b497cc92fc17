/// Test helper functions and service builders
use collection_ops::modules::collection::{InMemoryMembershipStore, MembershipStore};
use collection_ops::modules::operations::{Operation, OperationRegistry};
use collection_ops::shared::AppConfig;
use collection_ops::AppServices;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

pub const POLL_INTERVAL: Duration = Duration::from_millis(5);
pub const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

pub fn test_config(worker_count: usize) -> AppConfig {
    AppConfig {
        database_url: None,
        worker_count,
        default_page_limit: 10,
    }
}

/// Build all services on top of the given store
pub fn build_test_services(store: &InMemoryMembershipStore, worker_count: usize) -> AppServices {
    let store: Arc<dyn MembershipStore> = Arc::new(store.clone());
    AppServices::build(store, &test_config(worker_count))
}

/// Poll until the operation is completed or failed
pub async fn wait_for_terminal(registry: &OperationRegistry, operation_id: &Uuid) -> Operation {
    let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
    loop {
        let operation = registry.get(operation_id).expect("operation registered");
        if operation.is_terminal() {
            return operation;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "operation {} did not finish: {:?}",
            operation_id,
            operation
        );
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}
