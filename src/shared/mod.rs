// Shared kernel used by every bounded context

pub mod application; // Shared application layer patterns
pub mod config; // Environment-driven configuration
pub mod errors; // Shared error types
#[cfg(feature = "postgres")]
pub mod infrastructure; // Shared infrastructure (database pool)
pub mod utils; // Shared utilities (logging)

pub use config::AppConfig;
#[cfg(feature = "postgres")]
pub use infrastructure::database::Database;
