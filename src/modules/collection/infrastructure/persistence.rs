/// Diesel-based implementation of MembershipStore
///
/// Every insert runs outside an explicit transaction, so each membership row
/// commits on its own. Unique violations on `uq_member_collection` are
/// reported through the typed `StoreError::DuplicateMembership`.
///
/// Diesel and r2d2 are synchronous; all queries and connection checkouts run
/// on tokio's blocking pool so callers suspend instead of holding a runtime
/// thread.
use super::models::{CollectionModel, MemberModel, NewMembership};
use crate::modules::collection::domain::{
    Collection, Member, MemberId, MembershipSession, MembershipStore, StoreError, StoreResult,
};
use crate::schema::{collection_memberships, collections, members};
use crate::shared::infrastructure::database::{Database, DbConnection};
use crate::{log_debug, log_error};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::task;
use uuid::Uuid;

impl From<DieselError> for StoreError {
    fn from(err: DieselError) -> Self {
        StoreError::Persistence(err.to_string())
    }
}

impl From<task::JoinError> for StoreError {
    fn from(err: task::JoinError) -> Self {
        StoreError::Persistence(format!("Database task failed: {}", err))
    }
}

pub struct DieselMembershipStore {
    database: Arc<Database>,
}

impl DieselMembershipStore {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Run `query` on a pooled connection inside `spawn_blocking`
    async fn run<T, F>(&self, query: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let database = Arc::clone(&self.database);

        task::spawn_blocking(move || -> StoreResult<T> {
            let mut conn = checkout(&database)?;
            query(&mut *conn)
        })
        .await?
    }
}

fn checkout(database: &Database) -> StoreResult<DbConnection> {
    database
        .get_connection()
        .map_err(|e| StoreError::Persistence(format!("Failed to get connection: {}", e)))
}

fn present_in(
    conn: &mut PgConnection,
    collection_id: Uuid,
    member_ids: &[MemberId],
) -> StoreResult<HashSet<MemberId>> {
    if member_ids.is_empty() {
        return Ok(HashSet::new());
    }

    let present: Vec<i64> = collection_memberships::table
        .filter(collection_memberships::collection_id.eq(collection_id))
        .filter(collection_memberships::member_id.eq_any(member_ids))
        .select(collection_memberships::member_id)
        .load(conn)?;

    Ok(present.into_iter().collect())
}

fn insert_one(conn: &mut PgConnection, member_id: MemberId, collection_id: Uuid) -> StoreResult<()> {
    let new_membership = NewMembership {
        member_id,
        collection_id,
    };

    match diesel::insert_into(collection_memberships::table)
        .values(&new_membership)
        .execute(conn)
    {
        Ok(_) => Ok(()),
        Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
            Err(StoreError::DuplicateMembership {
                member_id,
                collection_id,
            })
        }
        Err(e) => {
            log_error!(
                "Failed to insert member {} into collection {}: {}",
                member_id,
                collection_id,
                e
            );
            Err(e.into())
        }
    }
}

#[async_trait]
impl MembershipStore for DieselMembershipStore {
    async fn list_collections(&self) -> StoreResult<Vec<Collection>> {
        self.run(|conn| {
            let rows: Vec<CollectionModel> = collections::table
                .select(CollectionModel::as_select())
                .order((collections::collection_name.asc(), collections::id.asc()))
                .load(conn)?;

            Ok(rows.into_iter().map(Collection::from).collect())
        })
        .await
    }

    async fn find_collection(&self, id: Uuid) -> StoreResult<Option<Collection>> {
        self.run(move |conn| {
            let row: Option<CollectionModel> = collections::table
                .find(id)
                .select(CollectionModel::as_select())
                .first(conn)
                .optional()?;

            Ok(row.map(Collection::from))
        })
        .await
    }

    async fn member_page(
        &self,
        collection_id: Uuid,
        offset: i64,
        limit: i64,
    ) -> StoreResult<(Vec<Member>, i64)> {
        self.run(move |conn| {
            let total: i64 = collection_memberships::table
                .filter(collection_memberships::collection_id.eq(collection_id))
                .count()
                .get_result(conn)?;

            let rows: Vec<MemberModel> = collection_memberships::table
                .inner_join(members::table)
                .filter(collection_memberships::collection_id.eq(collection_id))
                .order(members::id.asc())
                .offset(offset)
                .limit(limit)
                .select(MemberModel::as_select())
                .load(conn)?;

            Ok((rows.into_iter().map(Member::from).collect(), total))
        })
        .await
    }

    async fn member_ids(&self, collection_id: Uuid) -> StoreResult<Vec<MemberId>> {
        self.run(move |conn| {
            let ids: Vec<i64> = collection_memberships::table
                .filter(collection_memberships::collection_id.eq(collection_id))
                .order(collection_memberships::member_id.asc())
                .select(collection_memberships::member_id)
                .load(conn)?;

            Ok(ids)
        })
        .await
    }

    async fn members_present(
        &self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>> {
        let member_ids = member_ids.to_vec();
        self.run(move |conn| present_in(conn, collection_id, &member_ids))
            .await
    }

    async fn open_session(&self) -> StoreResult<Box<dyn MembershipSession>> {
        let database = Arc::clone(&self.database);
        let conn = task::spawn_blocking(move || checkout(&database)).await??;

        log_debug!("Checked out dedicated connection for bulk-add session");
        Ok(Box::new(DieselSession { conn: Some(conn) }))
    }
}

/// Holds one pooled connection for the lifetime of a bulk-add job
pub struct DieselSession {
    /// Empty only while a query is running on the blocking pool
    conn: Option<DbConnection>,
}

impl DieselSession {
    /// Move the connection into `spawn_blocking` and take it back afterwards
    async fn run<T, F>(&mut self, query: F) -> StoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut conn = self.conn.take().ok_or_else(|| {
            StoreError::Persistence("Session connection was lost by an earlier query".to_string())
        })?;

        let (conn, result) = task::spawn_blocking(move || {
            let result = query(&mut *conn);
            (conn, result)
        })
        .await?;

        self.conn = Some(conn);
        result
    }
}

#[async_trait]
impl MembershipSession for DieselSession {
    async fn members_present(
        &mut self,
        collection_id: Uuid,
        member_ids: &[MemberId],
    ) -> StoreResult<HashSet<MemberId>> {
        let member_ids = member_ids.to_vec();
        self.run(move |conn| present_in(conn, collection_id, &member_ids))
            .await
    }

    async fn insert_membership(
        &mut self,
        member_id: MemberId,
        collection_id: Uuid,
    ) -> StoreResult<()> {
        self.run(move |conn| insert_one(conn, member_id, collection_id))
            .await
    }
}
