pub mod entities;
pub mod repositories;

// Re-exports for easy access
pub use entities::{dedupe_member_ids, Collection, CollectionPage, Member, MemberId};
pub use repositories::{MembershipSession, MembershipStore, StoreError, StoreResult};
