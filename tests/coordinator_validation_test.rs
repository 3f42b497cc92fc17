/// Request-time validation: nothing is created or inserted for a rejected request
mod utils;

use collection_ops::modules::collection::InMemoryMembershipStore;
use collection_ops::shared::errors::AppError;
use utils::{
    factories::{overlapping_pair, CollectionFactory},
    helpers,
};
use uuid::Uuid;

#[tokio::test]
async fn unknown_source_collection_is_rejected() {
    let store = InMemoryMembershipStore::new();
    let (_, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let err = services
        .coordinator
        .add_selected(Uuid::new_v4(), target.id, vec![1])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CollectionNotFound(_)));

    let err = services
        .coordinator
        .add_all(Uuid::new_v4(), target.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CollectionNotFound(_)));

    assert!(services.registry.is_empty());
    services.shutdown().await;
}

#[tokio::test]
async fn unknown_target_collection_is_rejected() {
    let store = InMemoryMembershipStore::new();
    let (source, _) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let err = services
        .coordinator
        .add_all(source.id, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::CollectionNotFound(_)));
    assert!(services.registry.is_empty());
    services.shutdown().await;
}

#[tokio::test]
async fn any_member_outside_the_source_rejects_the_request() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    // Exists as a member, but not in the source collection
    CollectionFactory::named("Elsewhere")
        .with_members([9])
        .build(&store)
        .await;
    let services = helpers::build_test_services(&store, 1);

    let err = services
        .coordinator
        .add_selected(source.id, target.id, vec![1, 9, 42])
        .await
        .unwrap_err();

    match err {
        AppError::InvalidMembership(message) => {
            assert!(message.contains("2 of 3"), "message: {}", message);
            assert!(message.contains("My List"));
        }
        other => panic!("expected InvalidMembership, got {:?}", other),
    }

    assert!(services.registry.is_empty());
    assert_eq!(store.member_ids_of(target.id).await, vec![2]);
    services.shutdown().await;
}

#[tokio::test]
async fn long_lists_of_missing_members_are_truncated() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let err = services
        .coordinator
        .add_selected(source.id, target.id, (100..130).collect())
        .await
        .unwrap_err();

    let AppError::InvalidMembership(message) = err else {
        panic!("expected InvalidMembership");
    };
    assert!(message.contains("30 of 30"));
    assert!(message.contains("109"));
    assert!(!message.contains("110"));
    services.shutdown().await;
}

#[tokio::test]
async fn same_source_and_target_is_allowed_and_inserts_nothing() {
    let store = InMemoryMembershipStore::new();
    let (source, _) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let outcome = services.coordinator.add_all(source.id, source.id).await.unwrap();
    let op = helpers::wait_for_terminal(&services.registry, &outcome.operation_id).await;

    assert_eq!((op.progress, op.total), (0, 0));
    assert_eq!(store.member_ids_of(source.id).await, vec![1, 2, 3]);
    services.shutdown().await;
}
