use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::db::queries;
use crate::models::job::Job;

/// Keyed persistence for jobs.
///
/// Implementations must keep every field (including `created_at`) intact
/// across a store/load cycle. A job stored as done or canceled is final:
/// later writes for the same id are ignored.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert or replace a job by id, unless the stored copy is already final.
    async fn store_job(&self, job: &Job) -> Result<(), StoreError>;

    async fn get_job(&self, id: &str) -> Result<Option<Job>, StoreError>;

    /// Every job sharing `parent_id`, in no particular order.
    async fn get_jobs_by_parent(&self, parent_id: &str) -> Result<Vec<Job>, StoreError>;

    /// Up to `limit` dispatched jobs that are neither done nor canceled, oldest first.
    async fn get_pending_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError>;

    /// Returns whether a job was removed.
    async fn delete_job(&self, id: &str) -> Result<bool, StoreError>;

    /// Check backend connectivity (for health checks).
    async fn health_check(&self) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// PostgreSQL-backed job store.
pub struct PgJobStore {
    pool: PgPool,
}

impl PgJobStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn store_job(&self, job: &Job) -> Result<(), StoreError> {
        if !queries::upsert_job(&self.pool, job).await? {
            tracing::debug!(job_id = %job.id, "Ignoring write to a finished job");
        }
        Ok(())
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>, StoreError> {
        Ok(queries::get_job(&self.pool, id).await?)
    }

    async fn get_jobs_by_parent(&self, parent_id: &str) -> Result<Vec<Job>, StoreError> {
        Ok(queries::get_jobs_by_parent(&self.pool, parent_id).await?)
    }

    async fn get_pending_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        Ok(queries::get_pending_jobs(&self.pool, limit).await?)
    }

    async fn delete_job(&self, id: &str) -> Result<bool, StoreError> {
        Ok(queries::delete_job(&self.pool, id).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// In-process job store, used when no database is configured.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, Job>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn store_job(&self, job: &Job) -> Result<(), StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.get(&job.id).is_some_and(Job::is_terminal) {
            tracing::debug!(job_id = %job.id, "Ignoring write to a finished job");
            return Ok(());
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get_job(&self, id: &str) -> Result<Option<Job>, StoreError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn get_jobs_by_parent(&self, parent_id: &str) -> Result<Vec<Job>, StoreError> {
        Ok(self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.parent_id == parent_id)
            .cloned()
            .collect())
    }

    async fn get_pending_jobs(&self, limit: usize) -> Result<Vec<Job>, StoreError> {
        let mut pending: Vec<Job> = self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| !job.is_terminal() && job.provider_id.is_some())
            .cloned()
            .collect();

        pending.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        pending.truncate(limit);
        Ok(pending)
    }

    async fn delete_job(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.jobs.write().await.remove(id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
