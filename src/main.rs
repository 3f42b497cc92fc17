use anyhow::{Context, Result};
use collection_ops::modules::collection::commands::{
    get_all_collection_metadata, get_collection_page, GetCollectionPageRequest,
};
use collection_ops::modules::collection::domain::Member;
use collection_ops::modules::collection::{InMemoryMembershipStore, MembershipStore};
use collection_ops::modules::operations::commands::{
    add_all_members_to_collection, get_operation_status, AddAllMembersRequest,
    GetOperationStatusRequest,
};
use collection_ops::shared::utils::init_logger;
use collection_ops::shared::AppConfig;
use collection_ops::{log_info, log_warn, AppServices};
use std::sync::Arc;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const DEMO_MEMBERS: i64 = 25;

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG may come from .env
    dotenvy::dotenv().ok();
    init_logger();
    let config = AppConfig::from_env().context("Invalid configuration")?;

    let store = build_store(&config).await?;
    let services = AppServices::build(store, &config);

    let collections = get_all_collection_metadata(&services.collection_service).await?;
    let (source, target) = match collections.as_slice() {
        [source, target, ..] => (source.clone(), target.clone()),
        _ => anyhow::bail!("At least two collections are required"),
    };

    let accepted = add_all_members_to_collection(
        AddAllMembersRequest {
            source_collection_id: source.id,
            target_collection_id: target.id,
        },
        &services.coordinator,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&accepted)?);

    loop {
        let status = get_operation_status(
            GetOperationStatusRequest {
                operation_id: accepted.operation_id.clone(),
            },
            &services.coordinator,
        )
        .await?;
        println!("{}", serde_json::to_string(&status)?);

        if status.status.is_terminal() {
            break;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }

    let page = get_collection_page(
        GetCollectionPageRequest {
            collection_id: target.id,
            offset: None,
            limit: None,
        },
        &services.collection_service,
    )
    .await?;
    println!("{}", serde_json::to_string_pretty(&page)?);

    services.shutdown().await;
    Ok(())
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn MembershipStore>> {
    #[cfg(feature = "postgres")]
    {
        if let Some(url) = config.database_url.as_deref() {
            use collection_ops::modules::collection::infrastructure::DieselMembershipStore;
            use collection_ops::shared::Database;

            let database = Database::new(url, config.worker_count)?;
            database.run_migrations()?;
            return Ok(Arc::new(DieselMembershipStore::new(Arc::new(database))));
        }
    }

    if config.database_url.is_some() {
        log_warn!("DATABASE_URL is set but the postgres feature is disabled; using in-memory store");
    }
    Ok(Arc::new(seed_demo_store().await?))
}

/// Two collections where the target already holds every fifth member
async fn seed_demo_store() -> Result<InMemoryMembershipStore> {
    let store = InMemoryMembershipStore::new().with_insert_delay(Duration::from_millis(20));
    let source = store.add_collection("All Companies").await;
    let target = store.add_collection("Liked Companies").await;

    for id in 1..=DEMO_MEMBERS {
        store.add_member(Member::new(id, format!("Company {}", id))).await;
        store.add_membership(id, source.id).await?;
        if id % 5 == 0 {
            store.add_membership(id, target.id).await?;
        }
    }

    log_info!(
        "Seeded in-memory store with {} members in '{}'",
        DEMO_MEMBERS,
        source.name
    );
    Ok(store)
}
