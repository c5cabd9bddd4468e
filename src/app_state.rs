use std::sync::Arc;

use crate::config::AppConfig;
use crate::db;
use crate::services::{
    client::Client,
    job_store::{JobStore, MemoryJobStore, PgJobStore},
    output_url::OutputUrlBuilder,
    three_play::ThreePlayProvider,
};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<Client>,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("DATABASE_URL must be set: job state is only shared between processes through PostgreSQL")]
    MissingDatabaseUrl,

    #[error("Failed to initialize job store: {0}")]
    Database(#[from] sqlx::Error),
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Connect the job store and register every configured provider.
    ///
    /// Without `DATABASE_URL` jobs are kept in this process's memory.
    pub async fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let store: Arc<dyn JobStore> = match &config.database_url {
            Some(url) => connect_store(url).await?,
            None => {
                tracing::warn!("DATABASE_URL not set, keeping jobs in memory");
                Arc::new(MemoryJobStore::new())
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// Like [`AppState::from_config`], but refuses the in-memory fallback.
    /// Used by processes that must see jobs written by the server.
    pub async fn from_config_shared(config: &AppConfig) -> Result<Self, StartupError> {
        let url = config
            .database_url
            .as_deref()
            .ok_or(StartupError::MissingDatabaseUrl)?;

        Ok(Self::with_store(config, connect_store(url).await?))
    }

    fn with_store(config: &AppConfig, store: Arc<dyn JobStore>) -> Self {
        let mut client = Client::new(store, OutputUrlBuilder::new(&config.callback_base_url));

        match config.three_play() {
            Some(three_play) => client.add_provider(Arc::new(ThreePlayProvider::new(three_play))),
            None => tracing::warn!("3Play credentials not set, provider disabled"),
        }

        Self::new(client)
    }
}

async fn connect_store(url: &str) -> Result<Arc<dyn JobStore>, sqlx::Error> {
    tracing::info!("Connecting to PostgreSQL database");
    let pool = db::init_pool(url).await?;

    tracing::info!("Running database migrations");
    db::run_migrations(&pool).await?;

    Ok(Arc::new(PgJobStore::new(pool)))
}
