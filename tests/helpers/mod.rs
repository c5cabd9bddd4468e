//! Fake providers and client setup shared by the integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use captions_broker::models::format::CaptionFormat;
use captions_broker::models::job::{Job, ProviderJob};
use captions_broker::services::client::Client;
use captions_broker::services::job_store::{JobStore, MemoryJobStore};
use captions_broker::services::output_url::OutputUrlBuilder;
use captions_broker::services::provider::{Provider, ProviderError};

use crate::fixtures::{SBV_CAPTION, SRT_CAPTION, SSA_CAPTION, VTT_CAPTION};

pub const FAKE_PROVIDER: &str = "test-provider";
pub const BROKEN_PROVIDER: &str = "broken-provider";
pub const URL_BASE: &str = "somepath";

/// Number of calls made to each provider capability.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub dispatch: AtomicUsize,
    pub get_job: AtomicUsize,
    pub get_jobs: AtomicUsize,
    pub download: AtomicUsize,
    pub cancel: AtomicUsize,
}

impl CallCounts {
    pub fn get(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

/// Provider that answers from memory.
pub struct FakeProvider {
    pub name: String,
    /// Status reported for every vendor job.
    pub status: String,
    /// Whether vendor jobs are reported as ready.
    pub done: bool,
    /// Fail status lookups with "oh no".
    pub fail_status: bool,
    /// Reject dispatches once this many have been accepted.
    pub dispatch_limit: Option<usize>,
    pub calls: Arc<CallCounts>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::named(FAKE_PROVIDER)
    }

    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: "My status".to_string(),
            done: false,
            fail_status: false,
            dispatch_limit: None,
            calls: Arc::new(CallCounts::default()),
        }
    }

    pub fn ready() -> Self {
        Self {
            status: "complete".to_string(),
            done: true,
            ..Self::new()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_status: true,
            ..Self::new()
        }
    }

    /// Accepts `limit` dispatches, then fails every later one.
    pub fn accepting(limit: usize) -> Self {
        Self {
            dispatch_limit: Some(limit),
            ..Self::new()
        }
    }

    fn report(&self, provider_id: &str) -> ProviderJob {
        ProviderJob {
            provider_id: provider_id.to_string(),
            status: self.status.clone(),
            done: self.done,
        }
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn dispatch_job(&self, job: &Job) -> Result<String, ProviderError> {
        let accepted = self.calls.dispatch.fetch_add(1, Ordering::SeqCst);
        if self.dispatch_limit.is_some_and(|limit| accepted >= limit) {
            return Err(ProviderError::Message("quota exceeded".to_string()));
        }
        Ok(format!("vendor-{}", job.id))
    }

    async fn get_job(&self, provider_id: &str) -> Result<ProviderJob, ProviderError> {
        self.calls.get_job.fetch_add(1, Ordering::SeqCst);
        if self.fail_status {
            return Err(ProviderError::Message("oh no".to_string()));
        }
        Ok(self.report(provider_id))
    }

    async fn get_jobs(&self, provider_ids: &[String]) -> Result<Vec<ProviderJob>, ProviderError> {
        self.calls.get_jobs.fetch_add(1, Ordering::SeqCst);
        if self.fail_status {
            return Err(ProviderError::Message("oh no".to_string()));
        }
        Ok(provider_ids.iter().map(|id| self.report(id)).collect())
    }

    async fn download(
        &self,
        _provider_id: &str,
        format: CaptionFormat,
    ) -> Result<Vec<u8>, ProviderError> {
        self.calls.download.fetch_add(1, Ordering::SeqCst);
        let caption = match format {
            CaptionFormat::Vtt => VTT_CAPTION,
            CaptionFormat::Srt => SRT_CAPTION,
            CaptionFormat::Sbv => SBV_CAPTION,
            CaptionFormat::Ssa => SSA_CAPTION,
        };
        Ok(caption.as_bytes().to_vec())
    }

    fn supports_cancel(&self) -> bool {
        true
    }

    async fn cancel_job(&self, _provider_id: &str) -> Result<(), ProviderError> {
        self.calls.cancel.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Provider whose every call fails. Does not support cancellation.
pub struct BrokenProvider;

#[async_trait]
impl Provider for BrokenProvider {
    fn name(&self) -> &str {
        BROKEN_PROVIDER
    }

    async fn dispatch_job(&self, _job: &Job) -> Result<String, ProviderError> {
        Err(ProviderError::Message("dispatch error".to_string()))
    }

    async fn get_job(&self, _provider_id: &str) -> Result<ProviderJob, ProviderError> {
        Err(ProviderError::Message("status error".to_string()))
    }

    async fn get_jobs(&self, _provider_ids: &[String]) -> Result<Vec<ProviderJob>, ProviderError> {
        Err(ProviderError::Message("status error".to_string()))
    }

    async fn download(
        &self,
        _provider_id: &str,
        _format: CaptionFormat,
    ) -> Result<Vec<u8>, ProviderError> {
        Err(ProviderError::Download("vendor unavailable".to_string()))
    }
}

/// A client over an in-memory store, plus a handle on that store.
pub fn create_client() -> (Client, Arc<MemoryJobStore>) {
    let store = Arc::new(MemoryJobStore::new());
    let client = Client::new(store.clone(), OutputUrlBuilder::new(URL_BASE));
    (client, store)
}

/// An already-dispatched job for `provider`.
pub fn dispatched_job(id: &str, provider: &str) -> Job {
    Job {
        id: id.to_string(),
        parent_id: "parent".to_string(),
        media_url: "http://vp.nyt.com/video.mp4".to_string(),
        provider: provider.to_string(),
        provider_id: Some(format!("vendor-{id}")),
        language: "en".to_string(),
        created_at: chrono::Utc::now(),
        ..Default::default()
    }
}

pub async fn store(store: &Arc<MemoryJobStore>, job: &Job) {
    store.store_job(job).await.expect("Failed to store job");
}
