//! Database connection management

use std::time::Duration;

use clap::Args;
use sqlx::{
    PgPool, Postgres, Transaction,
    migrate::{MigrateError, Migrator},
    postgres::{PgConnectOptions, PgPoolOptions},
};

/// Embedded schema migrations, applied idempotently at startup.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Database connection and pool settings.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string; overrides the individual connection settings
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// `PostgreSQL` user
    #[arg(long, env = "POSTGRES_USER", default_value = "postgres")]
    pub postgres_user: String,

    /// `PostgreSQL` password
    #[arg(
        long,
        env = "POSTGRES_PASSWORD",
        default_value = "postgres",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub postgres_password: String,

    /// `PostgreSQL` host
    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    /// `PostgreSQL` port
    #[arg(long, env = "POSTGRES_PORT", default_value_t = 5432)]
    pub postgres_port: u16,

    /// `PostgreSQL` database name
    #[arg(long, env = "POSTGRES_DB", default_value = "catalog")]
    pub postgres_db: String,

    /// Connections kept open in the pool
    #[arg(long, env = "DB_POOL_SIZE", default_value_t = PoolSettings::DEFAULT_SIZE)]
    pub db_pool_size: u32,

    /// Extra connections the pool may open under load
    #[arg(long, env = "DB_MAX_OVERFLOW", default_value_t = PoolSettings::DEFAULT_MAX_OVERFLOW)]
    pub db_max_overflow: u32,

    /// Seconds to wait for a pooled connection before failing
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    pub db_acquire_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Connection options from `--database-url`, or from the individual settings.
    ///
    /// # Errors
    ///
    /// Returns an error when `--database-url` is not a valid connection string.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        match &self.database_url {
            Some(url) => url.parse(),
            None => Ok(PgConnectOptions::new()
                .host(&self.postgres_host)
                .port(self.postgres_port)
                .username(&self.postgres_user)
                .password(&self.postgres_password)
                .database(&self.postgres_db)),
        }
    }

    #[must_use]
    pub fn pool_settings(&self) -> PoolSettings {
        PoolSettings {
            size: self.db_pool_size,
            max_overflow: self.db_max_overflow,
            acquire_timeout: Duration::from_secs(self.db_acquire_timeout_secs),
        }
    }
}

/// Connection pool sizing.
///
/// `size` connections are kept open; up to `max_overflow` more are opened on
/// demand and closed again once idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub size: u32,
    pub max_overflow: u32,
    pub acquire_timeout: Duration,
}

impl PoolSettings {
    pub const DEFAULT_SIZE: u32 = 10;
    pub const DEFAULT_MAX_OVERFLOW: u32 = 20;

    #[must_use]
    pub fn max_connections(&self) -> u32 {
        self.size.saturating_add(self.max_overflow).max(1)
    }
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            max_overflow: Self::DEFAULT_MAX_OVERFLOW,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction. Dropping it without committing rolls it back.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired or `BEGIN` fails.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(
    options: PgConnectOptions,
    settings: PoolSettings,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .min_connections(settings.size.min(settings.max_connections()))
        .max_connections(settings.max_connections())
        .acquire_timeout(settings.acquire_timeout)
        .test_before_acquire(true)
        .connect_with(options)
        .await
}

/// Create or verify the schema.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
