use crate::log_info;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::LogContext;
use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::time::Duration;

pub type DbPool = Pool<ConnectionManager<PgConnection>>;
pub type DbConnection = r2d2::PooledConnection<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Connections kept aside for request-time validation reads
const REQUEST_CONNECTIONS: u32 = 4;

#[derive(Debug)]
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Build a pool large enough for every bulk-add worker to hold its own
    /// connection plus headroom for request handling
    pub fn new(database_url: &str, worker_count: usize) -> AppResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(database_url);

        let max_size = worker_count as u32 + REQUEST_CONNECTIONS;
        let pool = r2d2::Pool::builder()
            .max_size(max_size)
            .min_idle(Some(std::cmp::max(1, max_size / 4)))
            .connection_timeout(Duration::from_secs(10))
            .idle_timeout(Some(Duration::from_secs(300)))
            .max_lifetime(Some(Duration::from_secs(1800)))
            .test_on_check_out(true)
            .build(manager)
            .map_err(|e| {
                AppError::DatabaseError(format!("Failed to create connection pool: {}", e))
            })?;

        // Log connection target without exposing credentials
        log_info!(
            "Database connection pool initialized for {} with max_size: {}",
            database_url.split('@').last().unwrap_or("unknown_host"),
            pool.max_size()
        );

        Ok(Self { pool })
    }

    /// Blocks for up to the pool timeout; async callers go through `spawn_blocking`
    pub fn get_connection(&self) -> AppResult<DbConnection> {
        let start = std::time::Instant::now();

        match self.pool.get() {
            Ok(conn) => {
                let duration = start.elapsed().as_millis() as u64;
                if duration > 100 {
                    LogContext::performance_metric("db_connection_acquire", duration, Some("slow"));
                }
                Ok(conn)
            }
            Err(e) => {
                LogContext::error_with_context(
                    &e,
                    "Failed to acquire database connection from pool",
                );
                Err(AppError::from(e))
            }
        }
    }

    pub fn run_migrations(&self) -> AppResult<()> {
        let mut conn = self.get_connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| AppError::DatabaseError(format!("Failed to run migrations: {}", e)))?;
        log_info!("Database migrations completed successfully");
        Ok(())
    }
}
