//! # Connection Pool
//!
//! Opening the SQLite store and handing out repositories.
//!
//! ```text
//! ApiConfig ──db_config()──► DbConfig { url, pool sizes, timeouts }
//!                                 │
//!                      Database::new(config)
//!                                 │
//!               ┌─────────────────┴─────────────────┐
//!               │  SqlitePool (≤ max_connections)   │
//!               └───────┬───────────────────┬───────┘
//!                       ▼                   ▼
//!               db.orders()         db.order_details()
//!            (cheap; clone the pool per call site)
//! ```
//!
//! ## Connection Settings
//! - Foreign keys are always on (cascade delete of details depends on it)
//! - File databases use WAL with NORMAL synchronous
//! - In-memory databases use a single connection that is never recycled,
//!   since each SQLite connection would otherwise see its own empty database

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::order::OrderRepository;
use crate::repository::order_detail::OrderDetailRepository;

/// URL of a private in-memory database.
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Pool and connection settings.
///
/// ## Example
/// ```rust,ignore
/// let config = DbConfig::new("sqlite://ordo.db")
///     .max_connections(5)
///     .run_migrations(false);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// sqlx SQLite URL, e.g. `sqlite://ordo.db` or `sqlite::memory:`.
    pub database_url: String,

    /// Upper bound on open connections.
    /// Default: 5
    pub max_connections: u32,

    /// Connections kept open while idle.
    /// Default: 1
    pub min_connections: u32,

    /// How long to wait for a free connection.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether `Database::new` runs migrations.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the given database URL.
    pub fn new(url: impl Into<String>) -> Self {
        DbConfig {
            database_url: url.into(),
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// Overrides `max_connections`.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Overrides `min_connections`.
    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    /// Overrides the acquire timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Turns automatic migration in `Database::new` on or off.
    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    /// A private, throwaway database for tests.
    ///
    /// ```rust,ignore
    /// let db = Database::new(DbConfig::in_memory()).await?;
    /// ```
    pub fn in_memory() -> Self {
        DbConfig {
            database_url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    /// True when the URL points at an in-memory database.
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the order store.
///
/// Cheap to clone; clones share the pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool.
    ///
    /// Creates the database file when missing, enables foreign keys (plus
    /// WAL for files) and migrates when `config.run_migrations` is set.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(url = %config.database_url, "Initializing database connection");

        let mut connect_options = SqliteConnectOptions::from_str(&config.database_url)
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
            .foreign_keys(true)
            .create_if_missing(true);

        let in_memory = config.is_in_memory();
        if !in_memory {
            connect_options = connect_options
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal);
        }

        debug!(in_memory, "Connection options configured");

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(config.idle_timeout);

        if in_memory {
            pool_options = pool_options.max_lifetime(None);
        }

        let pool = pool_options
            .connect_with(connect_options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let db = Database { pool };

        if config.run_migrations {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies pending migrations. Idempotent.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await?;

        let (total, applied) = migrations::migration_status(&self.pool).await?;
        info!(total, applied, "Migrations complete");
        Ok(())
    }

    /// The underlying pool, for queries outside the repositories.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Returns the order repository.
    pub fn orders(&self) -> OrderRepository {
        OrderRepository::new(self.pool.clone())
    }

    /// Returns the order detail repository.
    pub fn order_details(&self) -> OrderDetailRepository {
        OrderDetailRepository::new(self.pool.clone())
    }

    /// Closes the pool. Repository calls fail afterwards.
    pub async fn close(&self) {
        info!("Closing database connection pool");
        self.pool.close().await;
    }

    /// True when the database answers `SELECT 1`.
    pub async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
