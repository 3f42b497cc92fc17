/// Test data factories using builder pattern
///
/// Seeds an in-memory store with collections and members in one call
use collection_ops::modules::collection::domain::{Collection, Member, MemberId};
use collection_ops::modules::collection::InMemoryMembershipStore;

pub struct CollectionFactory {
    name: String,
    member_ids: Vec<MemberId>,
}

impl CollectionFactory {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            member_ids: Vec::new(),
        }
    }

    /// Members to place in the collection. Missing member rows are created.
    pub fn with_members(mut self, member_ids: impl IntoIterator<Item = MemberId>) -> Self {
        self.member_ids.extend(member_ids);
        self
    }

    pub async fn build(self, store: &InMemoryMembershipStore) -> Collection {
        let collection = store.add_collection(&self.name).await;
        for id in self.member_ids {
            store.add_member(member(id)).await;
            store
                .add_membership(id, collection.id)
                .await
                .expect("seed membership");
        }
        collection
    }
}

pub fn member(id: MemberId) -> Member {
    Member::new(id, format!("Company {}", id))
}

/// Source {1,2,3} and target {2}: the canonical partial-overlap setup
pub async fn overlapping_pair(store: &InMemoryMembershipStore) -> (Collection, Collection) {
    let source = CollectionFactory::named("My List")
        .with_members([1, 2, 3])
        .build(store)
        .await;
    let target = CollectionFactory::named("Liked Companies")
        .with_members([2])
        .build(store)
        .await;
    (source, target)
}
