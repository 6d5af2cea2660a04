//! App Context

use std::sync::Arc;

use sqlx::{PgPool, migrate::MigrateError};
use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, DatabaseConfig, Db},
    domain::products::{PgProductsService, ProductsService},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid database connection settings")]
    Config(#[source] sqlx::Error),

    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
}

impl AppContext {
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        let db = Db::new(pool);

        Self {
            products: Arc::new(PgProductsService::new(db)),
        }
    }
}

/// Open the pool described by `config` and bring the schema up to date.
///
/// # Errors
///
/// Returns an error when connecting or migrating fails.
pub async fn connect_and_migrate(config: &DatabaseConfig) -> Result<PgPool, AppInitError> {
    let options = config.connect_options().map_err(AppInitError::Config)?;
    let settings = config.pool_settings();

    let pool = database::connect(options, settings)
        .await
        .map_err(AppInitError::Database)?;

    database::migrate(&pool)
        .await
        .map_err(AppInitError::Migrate)?;

    info!(
        pool_size = settings.size,
        max_connections = settings.max_connections(),
        "database schema created or verified"
    );

    Ok(pool)
}
