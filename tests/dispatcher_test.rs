/// Executor pool behavior: draining shutdown and concurrent operations
mod utils;

use collection_ops::modules::collection::InMemoryMembershipStore;
use collection_ops::modules::operations::OperationStatus;
use collection_ops::shared::errors::AppError;
use futures::future::join_all;
use std::time::Duration;
use utils::{
    factories::{overlapping_pair, CollectionFactory},
    helpers,
};

#[tokio::test]
async fn shutdown_drains_queued_operations() {
    let store = InMemoryMembershipStore::new().with_insert_delay(Duration::from_millis(5));
    let source = CollectionFactory::named("Source")
        .with_members(1..=4)
        .build(&store)
        .await;
    let targets = [
        CollectionFactory::named("A").build(&store).await,
        CollectionFactory::named("B").build(&store).await,
        CollectionFactory::named("C").build(&store).await,
    ];
    let services = helpers::build_test_services(&store, 1);

    let mut operation_ids = Vec::new();
    for target in &targets {
        let outcome = services.coordinator.add_all(source.id, target.id).await.unwrap();
        operation_ids.push(outcome.operation_id);
    }

    services.shutdown().await;

    for operation_id in &operation_ids {
        let op = services.registry.get(operation_id).unwrap();
        assert_eq!(op.status, OperationStatus::Completed);
        assert_eq!(op.progress, 4);
    }
    for target in &targets {
        assert_eq!(store.member_ids_of(target.id).await, vec![1, 2, 3, 4]);
    }
    assert_eq!(store.open_sessions(), 0);
}

#[tokio::test]
async fn requests_after_shutdown_are_rejected_and_recorded_as_failed() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    services.shutdown().await;
    assert!(!services.dispatcher.is_accepting());

    let err = services
        .coordinator
        .add_all(source.id, target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InternalError(_)));

    let stats = services.registry.statistics();
    assert_eq!(stats.total_count, 1);
    assert_eq!(stats.failed_count, 1);
    assert_eq!(store.member_ids_of(target.id).await, vec![2]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_operations_on_one_target_insert_each_member_once() {
    let store = InMemoryMembershipStore::new().with_insert_delay(Duration::from_millis(1));
    let source = CollectionFactory::named("Source")
        .with_members(1..=30)
        .build(&store)
        .await;
    let target = CollectionFactory::named("Target")
        .with_members([10, 20])
        .build(&store)
        .await;
    let services = helpers::build_test_services(&store, 4);

    let outcomes = join_all(
        (0..4).map(|_| services.coordinator.add_all(source.id, target.id)),
    )
    .await;

    let mut inserted = 0;
    for outcome in outcomes {
        let outcome = outcome.unwrap();
        let op = helpers::wait_for_terminal(&services.registry, &outcome.operation_id).await;
        assert_eq!(op.status, OperationStatus::Completed);
        assert!(op.progress <= op.total);
        inserted += op.progress;
    }

    // Conflicts between racing operations are skipped, never double counted
    assert_eq!(inserted, 28);
    assert_eq!(
        store.member_ids_of(target.id).await,
        (1..=30).collect::<Vec<i64>>()
    );
    assert_eq!(services.registry.statistics().completed_count, 4);
    services.shutdown().await;
}

#[tokio::test]
async fn independent_operations_run_side_by_side() {
    let store = InMemoryMembershipStore::new().with_insert_delay(Duration::from_millis(2));
    let left = CollectionFactory::named("Left")
        .with_members(1..=5)
        .build(&store)
        .await;
    let right = CollectionFactory::named("Right")
        .with_members(6..=10)
        .build(&store)
        .await;
    let services = helpers::build_test_services(&store, 2);

    let to_right = services.coordinator.add_all(left.id, right.id).await.unwrap();
    let to_left = services.coordinator.add_all(right.id, left.id).await.unwrap();

    let a = helpers::wait_for_terminal(&services.registry, &to_right.operation_id).await;
    let b = helpers::wait_for_terminal(&services.registry, &to_left.operation_id).await;

    assert_eq!((a.progress, b.progress), (5, 5));
    assert_eq!(store.member_ids_of(left.id).await, (1..=10).collect::<Vec<i64>>());
    assert_eq!(store.member_ids_of(right.id).await, (1..=10).collect::<Vec<i64>>());
    services.shutdown().await;
}
