/// Runtime configuration loaded from the environment (and `.env` via dotenvy)
use crate::log_info;
use crate::shared::errors::{AppError, AppResult};
use std::env;

pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound for the derived worker pool size
const MAX_DEFAULT_WORKERS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// PostgreSQL URL; only consulted when the `postgres` feature is enabled
    pub database_url: Option<String>,
    /// Number of executors draining the bulk-add queue
    pub worker_count: usize,
    /// Page size used when a collection page request omits `limit`
    pub default_page_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            worker_count: Self::default_worker_count(),
            default_page_limit: DEFAULT_PAGE_LIMIT,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment, reading `.env` first if present
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(key).ok())?;

        log_info!(
            "Configuration loaded (workers: {}, page limit: {}, database: {})",
            config.worker_count,
            config.default_page_limit,
            if config.database_url.is_some() {
                "configured"
            } else {
                "in-memory"
            }
        );

        Ok(config)
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = match lookup("DATABASE_URL") {
            Some(url) if !url.trim().is_empty() => Some(Self::validate_database_url(url)?),
            _ => None,
        };

        let worker_count = match lookup("BULK_ADD_WORKERS") {
            Some(raw) => {
                let count: usize = raw.trim().parse()?;
                if count == 0 {
                    return Err(AppError::ValidationError(
                        "BULK_ADD_WORKERS must be at least 1".to_string(),
                    ));
                }
                count
            }
            None => Self::default_worker_count(),
        };

        let default_page_limit = match lookup("DEFAULT_PAGE_LIMIT") {
            Some(raw) => raw.trim().parse()?,
            None => DEFAULT_PAGE_LIMIT,
        };

        Ok(Self {
            database_url,
            worker_count,
            default_page_limit,
        })
    }

    fn validate_database_url(database_url: String) -> AppResult<String> {
        if !database_url.starts_with("postgres://") && !database_url.starts_with("postgresql://") {
            return Err(AppError::ValidationError(
                "Invalid database URL format. Must start with postgres:// or postgresql://"
                    .to_string(),
            ));
        }
        Ok(database_url)
    }

    /// Base pool size on CPU count, capped
    fn default_worker_count() -> usize {
        let cpu_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4);
        cpu_count.clamp(1, MAX_DEFAULT_WORKERS)
    }
}
