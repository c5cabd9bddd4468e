use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::models::format::CaptionFormat;
use crate::models::job::{Job, JobSummary, DISPATCHED_STATUS};
use crate::models::request::JobRequest;
use crate::services::job_store::{JobStore, StoreError};
use crate::services::output_url::OutputUrlBuilder;
use crate::services::provider::{Provider, ProviderError};
use crate::services::transcript::{self, TranscriptError};

/// Coordinates callers, the job store and the registered providers.
///
/// The provider registry is filled at startup and only read afterwards; the
/// client keeps no other mutable state, so it can be shared behind an `Arc`.
pub struct Client {
    store: Arc<dyn JobStore>,
    providers: HashMap<String, Arc<dyn Provider>>,
    urls: OutputUrlBuilder,
}

impl Client {
    pub fn new(store: Arc<dyn JobStore>, urls: OutputUrlBuilder) -> Self {
        Self {
            store,
            providers: HashMap::new(),
            urls,
        }
    }

    /// Register a provider under its own name. A later registration with the
    /// same name replaces the earlier one.
    pub fn add_provider(&mut self, provider: Arc<dyn Provider>) {
        let name = provider.name().to_string();
        if self.providers.insert(name.clone(), provider).is_some() {
            warn!(provider = %name, "Replacing previously registered provider");
        } else {
            info!(provider = %name, "Registered caption provider");
        }
    }

    /// Names of the registered providers, sorted.
    pub fn providers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.providers.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Build the jobs for a request and dispatch them one by one.
    ///
    /// Stops at the first failure; jobs dispatched before it stay persisted.
    pub async fn dispatch_request(&self, request: &JobRequest) -> Result<Vec<Job>, ClientError> {
        let mut jobs = Job::from_request(request);
        for job in jobs.iter_mut() {
            self.dispatch_job(job).await?;
        }
        Ok(jobs)
    }

    /// Send a job to its provider and persist it with the vendor identifier.
    pub async fn dispatch_job(&self, job: &mut Job) -> Result<(), ClientError> {
        let provider = self.provider(&job.provider)?;

        let provider_id = provider.dispatch_job(job).await.map_err(|e| {
            warn!(job_id = %job.id, provider = %job.provider, error = %e, "Failed to dispatch job");
            provider_failure(&job.provider, e)
        })?;

        job.provider_id = Some(provider_id);
        job.status = DISPATCHED_STATUS.to_string();
        job.updated_at = chrono::Utc::now();
        self.store.store_job(job).await?;

        metrics::counter!("caption_jobs_dispatched_total", "provider" => job.provider.clone())
            .increment(1);
        info!(
            job_id = %job.id,
            parent_id = %job.parent_id,
            provider = %job.provider,
            provider_id = job.provider_id.as_deref().unwrap_or_default(),
            "Job dispatched"
        );

        Ok(())
    }

    /// Load a job, refreshing its status from the vendor unless it is terminal.
    pub async fn get_job(&self, id: &str) -> Result<Job, ClientError> {
        let mut job = self.load(id).await?;
        if job.is_terminal() {
            return Ok(job);
        }

        let provider = self.provider(&job.provider)?;
        let Some(provider_id) = job.provider_id.clone() else {
            debug!(job_id = %job.id, "Job has no vendor id yet, skipping status refresh");
            return Ok(job);
        };

        let report = provider.get_job(&provider_id).await.map_err(|e| {
            warn!(job_id = %job.id, provider = %job.provider, error = %e, "Failed to fetch job status");
            provider_failure(&job.provider, e)
        })?;

        let completed = job.apply_provider_status(&report, |p, f| self.urls.resolve(p, f));
        self.store.store_job(&job).await?;

        if completed {
            record_completion(&job);
        }

        Ok(job)
    }

    /// Summaries of every job sharing `parent_id`, newest first.
    ///
    /// Reads local state only; statuses are not refreshed from vendors.
    pub async fn get_jobs(&self, parent_id: &str) -> Result<Vec<JobSummary>, ClientError> {
        let mut jobs = self.store.get_jobs_by_parent(parent_id).await?;
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs.iter().map(Job::summary).collect())
    }

    /// Cancel a job that is still in flight.
    ///
    /// Returns `Ok(false)` without contacting the vendor when the job is already
    /// done or canceled. A job the vendor never saw is canceled locally, but only
    /// for providers that support cancellation.
    pub async fn cancel_job(&self, id: &str) -> Result<bool, ClientError> {
        let mut job = self.load(id).await?;
        if job.is_terminal() {
            return Ok(false);
        }

        let provider = self.provider(&job.provider)?;
        let cancel = match job.provider_id.as_deref() {
            Some(provider_id) => provider.cancel_job(provider_id).await,
            None if provider.supports_cancel() => Ok(()),
            None => Err(ProviderError::CancelUnsupported(job.provider.clone())),
        };
        cancel.map_err(|e| {
            warn!(job_id = %job.id, provider = %job.provider, error = %e, "Failed to cancel job");
            provider_failure(&job.provider, e)
        })?;

        job.cancel();
        self.store.store_job(&job).await?;

        metrics::counter!("caption_jobs_canceled_total", "provider" => job.provider.clone())
            .increment(1);
        info!(job_id = %job.id, provider = %job.provider, "Job canceled");

        Ok(true)
    }

    /// Raw caption file for a job in the given format.
    pub async fn download_caption(
        &self,
        id: &str,
        format: CaptionFormat,
    ) -> Result<Vec<u8>, ClientError> {
        let job = self.load(id).await?;
        let provider = self.provider(&job.provider)?;
        let provider_id = job
            .provider_id
            .as_deref()
            .ok_or_else(|| ClientError::NotDispatched(job.id.clone()))?;

        provider.download(provider_id, format).await.map_err(|e| {
            warn!(job_id = %job.id, provider = %job.provider, format = %format, error = %e, "Caption download failed");
            provider_failure(&job.provider, e)
        })
    }

    /// Plain-text transcript from caption bytes in the format named by `format`.
    pub fn generate_transcript(&self, caption: &[u8], format: &str) -> Result<String, ClientError> {
        Ok(transcript::generate(caption, format)?)
    }

    /// Download a job's captions and turn them into a transcript.
    pub async fn generate_job_transcript(
        &self,
        id: &str,
        format: &str,
    ) -> Result<String, ClientError> {
        let format = transcript::parse_format(format)?;
        let caption = self.download_caption(id, format).await?;
        Ok(transcript::generate_for(&caption, format))
    }

    /// Refresh up to `limit` in-flight jobs with one batch status call per provider.
    ///
    /// A provider that fails is logged and skipped so the others still refresh.
    /// Returns the number of jobs that became done.
    pub async fn refresh_pending_jobs(&self, limit: usize) -> Result<usize, ClientError> {
        let pending = self.store.get_pending_jobs(limit).await?;

        let mut by_provider: BTreeMap<String, Vec<Job>> = BTreeMap::new();
        for job in pending {
            by_provider.entry(job.provider.clone()).or_default().push(job);
        }

        let mut completed = 0;
        for (name, jobs) in by_provider {
            let Some(provider) = self.providers.get(&name) else {
                warn!(provider = %name, jobs = jobs.len(), "Pending jobs reference an unregistered provider");
                continue;
            };

            let ids: Vec<String> = jobs.iter().filter_map(|j| j.provider_id.clone()).collect();
            let reports = match provider.get_jobs(&ids).await {
                Ok(reports) => reports,
                Err(e) => {
                    metrics::counter!("caption_provider_errors_total", "provider" => name.clone())
                        .increment(1);
                    warn!(provider = %name, error = %e, "Batch status refresh failed");
                    continue;
                }
            };
            let reports: HashMap<&str, _> = reports
                .iter()
                .map(|r| (r.provider_id.as_str(), r))
                .collect();

            for mut job in jobs {
                let Some(report) = job.provider_id.as_deref().and_then(|id| reports.get(id)) else {
                    continue;
                };
                let done = job.apply_provider_status(report, |p, f| self.urls.resolve(p, f));
                self.store.store_job(&job).await?;
                if done {
                    record_completion(&job);
                    completed += 1;
                }
            }
        }

        Ok(completed)
    }

    async fn load(&self, id: &str) -> Result<Job, ClientError> {
        self.store
            .get_job(id)
            .await?
            .ok_or(ClientError::JobNotFound)
    }

    fn provider(&self, name: &str) -> Result<&Arc<dyn Provider>, ClientError> {
        self.providers.get(name).ok_or(ClientError::ProviderNotFound)
    }
}

fn provider_failure(provider: &str, error: ProviderError) -> ClientError {
    metrics::counter!("caption_provider_errors_total", "provider" => provider.to_string())
        .increment(1);
    ClientError::Provider(error)
}

fn record_completion(job: &Job) {
    metrics::counter!("caption_jobs_completed_total", "provider" => job.provider.clone())
        .increment(1);
    info!(
        job_id = %job.id,
        provider = %job.provider,
        outputs = job.outputs.len(),
        "Job captions ready"
    );
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Provider not found")]
    ProviderNotFound,

    #[error("Job doesn't exist")]
    JobNotFound,

    #[error("Job {0} has not been dispatched to a provider")]
    NotDispatched(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}
