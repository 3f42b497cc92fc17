pub mod modules;
#[cfg(feature = "postgres")]
mod schema;
pub mod shared;

use modules::{
    collection::{CollectionService, MembershipStore},
    operations::{BulkAddWorker, OperationCoordinator, OperationDispatcher, OperationRegistry},
};
use shared::AppConfig;
use std::sync::Arc;

/// Everything a transport layer needs to serve the commands.
///
/// Must be built inside a tokio runtime: the dispatcher spawns its executors
/// immediately.
pub struct AppServices {
    pub collection_service: Arc<CollectionService>,
    pub coordinator: Arc<OperationCoordinator>,
    pub registry: OperationRegistry,
    pub dispatcher: Arc<OperationDispatcher>,
}

impl AppServices {
    pub fn build(store: Arc<dyn MembershipStore>, config: &AppConfig) -> Self {
        // One registry for the whole process, shared by coordinator and workers
        let registry = OperationRegistry::new();

        let worker = Arc::new(BulkAddWorker::new(Arc::clone(&store), registry.clone()));
        let dispatcher = Arc::new(OperationDispatcher::start(worker, config.worker_count));

        let collection_service = Arc::new(CollectionService::new(
            Arc::clone(&store),
            config.default_page_limit,
        ));
        let coordinator = Arc::new(OperationCoordinator::new(
            store,
            registry.clone(),
            Arc::clone(&dispatcher),
        ));

        log_info!(
            "Services initialized with {} bulk-add executors",
            dispatcher.worker_count()
        );

        Self {
            collection_service,
            coordinator,
            registry,
            dispatcher,
        }
    }

    /// Stop accepting new operations and wait for queued ones to finish
    pub async fn shutdown(&self) {
        self.dispatcher.shutdown().await;
        let stats = self.registry.statistics();
        log_info!(
            "Shutdown complete - {} operations tracked ({} completed, {} failed)",
            stats.total_count,
            stats.completed_count,
            stats.failed_count
        );
    }
}
