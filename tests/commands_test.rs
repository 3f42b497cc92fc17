/// Command surface: request/response shapes and error status mapping
mod utils;

use collection_ops::modules::collection::commands::{
    get_all_collection_metadata, get_collection_page, GetCollectionPageRequest,
};
use collection_ops::modules::collection::InMemoryMembershipStore;
use collection_ops::modules::operations::commands::{
    add_all_members_to_collection, add_members_to_collection, get_operation_status,
    AddAllMembersRequest, AddMembersRequest, GetOperationStatusRequest,
};
use collection_ops::modules::operations::OperationStatus;
use collection_ops::shared::errors::ApiError;
use utils::{
    factories::{overlapping_pair, CollectionFactory},
    helpers,
};
use uuid::Uuid;

// ================================================================================================
// COLLECTIONS
// ================================================================================================

#[tokio::test]
async fn collection_metadata_lists_every_collection() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let metadata = get_all_collection_metadata(&services.collection_service)
        .await
        .unwrap();

    let names: Vec<_> = metadata.iter().map(|c| c.collection_name.as_str()).collect();
    assert_eq!(names, vec!["Liked Companies", "My List"]);
    assert_eq!(metadata[0].id, target.id);
    assert_eq!(metadata[1].id, source.id);
    services.shutdown().await;
}

#[tokio::test]
async fn collection_page_uses_default_limit_and_reports_total() {
    let store = InMemoryMembershipStore::new();
    let collection = CollectionFactory::named("Big")
        .with_members(1..=12)
        .build(&store)
        .await;
    let services = helpers::build_test_services(&store, 1);

    let first = get_collection_page(
        GetCollectionPageRequest {
            collection_id: collection.id,
            offset: None,
            limit: None,
        },
        &services.collection_service,
    )
    .await
    .unwrap();
    assert_eq!(first.collection_name, "Big");
    assert_eq!(first.members.len(), 10);
    assert_eq!(first.total, 12);
    assert_eq!(first.members[0].id, 1);

    let rest = get_collection_page(
        GetCollectionPageRequest {
            collection_id: collection.id,
            offset: Some(10),
            limit: Some(5),
        },
        &services.collection_service,
    )
    .await
    .unwrap();
    assert_eq!(rest.members.iter().map(|m| m.id).collect::<Vec<_>>(), vec![11, 12]);
    assert_eq!(rest.total, 12);
    services.shutdown().await;
}

#[tokio::test]
async fn missing_collection_page_is_404() {
    let store = InMemoryMembershipStore::new();
    let services = helpers::build_test_services(&store, 1);

    let err = get_collection_page(
        GetCollectionPageRequest {
            collection_id: Uuid::new_v4(),
            offset: None,
            limit: None,
        },
        &services.collection_service,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 404);
    assert_eq!(
        err,
        ApiError::NotFound {
            resource: "Collection not found".to_string()
        }
    );
    services.shutdown().await;
}

// ================================================================================================
// OPERATIONS
// ================================================================================================

#[tokio::test]
async fn add_then_poll_through_commands() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let accepted = add_members_to_collection(
        AddMembersRequest {
            source_collection_id: source.id,
            target_collection_id: target.id,
            member_ids: vec![1, 3],
        },
        &services.coordinator,
    )
    .await
    .unwrap();
    assert_eq!(accepted.message, "Adding 2 members to Liked Companies");
    let operation_id: Uuid = accepted.operation_id.parse().unwrap();

    helpers::wait_for_terminal(&services.registry, &operation_id).await;

    let status = get_operation_status(
        GetOperationStatusRequest {
            operation_id: accepted.operation_id.clone(),
        },
        &services.coordinator,
    )
    .await
    .unwrap();
    assert_eq!(status.operation_id, accepted.operation_id);
    assert_eq!(status.status, OperationStatus::Completed);
    assert_eq!((status.progress, status.total), (2, 2));
    assert_eq!(status.error_message, None);

    let json = serde_json::to_value(&status).unwrap();
    assert_eq!(json["status"], "completed");
    services.shutdown().await;
}

#[tokio::test]
async fn invalid_membership_is_400() {
    let store = InMemoryMembershipStore::new();
    let (source, target) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let err = add_members_to_collection(
        AddMembersRequest {
            source_collection_id: source.id,
            target_collection_id: target.id,
            member_ids: vec![1, 99],
        },
        &services.coordinator,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 400);
    assert!(matches!(err, ApiError::BadRequest { .. }));
    services.shutdown().await;
}

#[tokio::test]
async fn add_all_to_missing_collection_is_404() {
    let store = InMemoryMembershipStore::new();
    let (source, _) = overlapping_pair(&store).await;
    let services = helpers::build_test_services(&store, 1);

    let err = add_all_members_to_collection(
        AddAllMembersRequest {
            source_collection_id: source.id,
            target_collection_id: Uuid::new_v4(),
        },
        &services.coordinator,
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), 404);
    services.shutdown().await;
}

#[tokio::test]
async fn unknown_or_malformed_operation_ids_are_404() {
    let store = InMemoryMembershipStore::new();
    let services = helpers::build_test_services(&store, 1);

    for operation_id in [Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let err = get_operation_status(
            GetOperationStatusRequest { operation_id },
            &services.coordinator,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            ApiError::NotFound {
                resource: "Operation not found".to_string()
            }
        );
    }
    services.shutdown().await;
}

#[test]
fn api_errors_serialize_with_kind_tag() {
    let err = ApiError::BadRequest {
        message: "bad".to_string(),
    };
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["kind"], "bad_request");
    assert_eq!(json["message"], "bad");
}
