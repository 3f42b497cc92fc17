pub mod collection;

pub use collection::{dedupe_member_ids, Collection, CollectionPage, Member, MemberId};
