use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, Store};

/// `DATABASE_URL` value that selects the process-local store.
pub const MEMORY_DATABASE_URL: &str = "memory:";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env().context("load configuration")?);

        if config.database_url == MEMORY_DATABASE_URL {
            warn!("using in-memory store; data is lost on restart");
            return Ok(Self::from_parts(Arc::new(MemoryStore::new()), config));
        }

        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .context("run migrations")?;
        info!("migrations applied");

        Ok(Self::from_parts(Arc::new(PgStore::new(db)), config))
    }

    pub fn from_parts(store: Arc<dyn Store>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }
}
