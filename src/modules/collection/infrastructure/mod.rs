pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod models;
#[cfg(feature = "postgres")]
pub mod persistence;

pub use in_memory::InMemoryMembershipStore;
#[cfg(feature = "postgres")]
pub use persistence::DieselMembershipStore;
