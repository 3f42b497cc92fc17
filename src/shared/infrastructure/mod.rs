/// Shared infrastructure concerns
///
/// Infrastructure implementations shared across bounded contexts.
pub mod database;

pub use database::{Database, DbConnection, DbPool};
