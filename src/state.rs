use std::sync::Arc;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::cache::CacheClient;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub cache: CacheClient,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let cache = CacheClient::connect(config.redis_url.as_deref()).await;

        Ok(Self { db, config, cache })
    }

    pub fn from_parts(db: PgPool, config: Arc<AppConfig>, cache: CacheClient) -> Self {
        Self { db, config, cache }
    }
}
