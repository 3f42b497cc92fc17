pub mod membership_store;

pub use membership_store::{MembershipSession, MembershipStore, StoreError, StoreResult};
