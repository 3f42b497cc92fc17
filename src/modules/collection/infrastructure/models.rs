use crate::modules::collection::domain::{Collection, Member};
use crate::schema::{collection_memberships, collections, members};
use diesel::prelude::*;
use uuid::Uuid;

// ============= COLLECTION MODELS =============

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = collections)]
pub struct CollectionModel {
    pub id: Uuid,
    pub collection_name: String,
}

impl From<CollectionModel> for Collection {
    fn from(model: CollectionModel) -> Self {
        Collection::with_id(model.id, model.collection_name)
    }
}

// ============= MEMBER MODELS =============

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = members)]
pub struct MemberModel {
    pub id: i64,
    pub name: String,
}

impl From<MemberModel> for Member {
    fn from(model: MemberModel) -> Self {
        Member::new(model.id, model.name)
    }
}

// ============= MEMBERSHIP ASSOCIATION =============

// Unique on (member_id, collection_id) via uq_member_collection
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = collection_memberships)]
pub struct NewMembership {
    pub member_id: i64,
    pub collection_id: Uuid,
}
