use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a record that can belong to collections
pub type MemberId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: Uuid,
    pub name: String,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    pub fn with_id(id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One page of a collection's members, ordered by member id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionPage {
    pub collection: Collection,
    pub members: Vec<Member>,
    pub total_count: i64,
}

/// Drop repeated ids, keeping the first occurrence of each in place
pub fn dedupe_member_ids(member_ids: Vec<MemberId>) -> Vec<MemberId> {
    let mut seen = std::collections::HashSet::with_capacity(member_ids.len());
    member_ids.into_iter().filter(|id| seen.insert(*id)).collect()
}
