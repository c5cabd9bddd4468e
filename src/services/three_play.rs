use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::{debug, error};

use crate::models::format::CaptionFormat;
use crate::models::job::{Job, ProviderJob};
use crate::services::provider::{Provider, ProviderError};

pub const PROVIDER_NAME: &str = "3play";

/// File state 3Play reports once captions are available.
const COMPLETE_STATE: &str = "complete";

/// Credentials and endpoint for the 3Play Media API.
#[derive(Debug, Clone)]
pub struct ThreePlayConfig {
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
}

/// Client for the 3Play Media v1 files API.
pub struct ThreePlayProvider {
    http: Client,
    config: ThreePlayConfig,
}

#[derive(Debug, Deserialize)]
struct ThreePlayFile {
    id: u64,
    #[serde(default)]
    state: String,
}

#[derive(Debug, Deserialize)]
struct FilesPage {
    #[serde(default)]
    files: Vec<ThreePlayFile>,
}

impl From<ThreePlayFile> for ProviderJob {
    fn from(file: ThreePlayFile) -> Self {
        ProviderJob {
            provider_id: file.id.to_string(),
            done: file.state == COMPLETE_STATE,
            status: file.state,
        }
    }
}

impl ThreePlayProvider {
    pub fn new(config: ThreePlayConfig) -> Self {
        Self {
            http: Client::new(),
            config: ThreePlayConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }
}

#[async_trait]
impl Provider for ThreePlayProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    /// Upload the job's media by URL. Provider params are forwarded as form fields.
    async fn dispatch_job(&self, job: &Job) -> Result<String, ProviderError> {
        let mut form: Vec<(&str, &str)> = vec![
            ("apikey", self.config.api_key.as_str()),
            ("api_secret_key", self.config.api_secret.as_str()),
            ("link", job.media_url.as_str()),
        ];
        form.extend(
            job.provider_params
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str())),
        );

        let response = self
            .http
            .post(self.url("/files"))
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                error!(job_id = %job.id, error = %e, "Failed to dispatch job to 3Play");
                ProviderError::Http(e)
            })?;

        let body = check_status(response).await?.text().await?;
        let file_id = body.trim();
        parse_file_id(file_id)
            .map_err(|_| ProviderError::UnexpectedResponse(format!("expected a file id, got {file_id:?}")))?;

        debug!(job_id = %job.id, file_id, "3Play accepted media upload");
        Ok(file_id.to_string())
    }

    async fn get_job(&self, provider_id: &str) -> Result<ProviderJob, ProviderError> {
        let file_id = parse_file_id(provider_id)?;

        let response = self
            .http
            .get(self.url(&format!("/files/{file_id}")))
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await?;

        let file: ThreePlayFile = check_status(response).await?.json().await?;
        Ok(file.into())
    }

    async fn get_jobs(&self, provider_ids: &[String]) -> Result<Vec<ProviderJob>, ProviderError> {
        if provider_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = vec![("apikey".to_string(), self.config.api_key.clone())];
        for id in provider_ids {
            query.push(("file_id".to_string(), parse_file_id(id)?.to_string()));
        }

        let response = self
            .http
            .get(self.url("/files"))
            .query(&query)
            .send()
            .await?;

        let page: FilesPage = check_status(response).await?.json().await?;
        Ok(page.files.into_iter().map(ProviderJob::from).collect())
    }

    async fn download(
        &self,
        provider_id: &str,
        format: CaptionFormat,
    ) -> Result<Vec<u8>, ProviderError> {
        let file_id = parse_file_id(provider_id)?;

        let response = self
            .http
            .get(self.url(&format!("/files/{file_id}/captions.{}", format.extension())))
            .query(&[("apikey", self.config.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Download(format!(
                "3Play returned {} for {format} captions of file {file_id}",
                response.status()
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

/// 3Play file ids are numeric.
fn parse_file_id(id: &str) -> Result<u64, ProviderError> {
    id.trim()
        .parse()
        .map_err(|_| ProviderError::InvalidId(id.to_string()))
}

async fn check_status(response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ProviderError::Api {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> ThreePlayProvider {
        ThreePlayProvider::new(ThreePlayConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            base_url: "https://api.3playmedia.com/".to_string(),
        })
    }

    #[test]
    fn test_file_ids_must_be_numeric() {
        assert_eq!(parse_file_id("1234").unwrap(), 1234);
        assert!(matches!(
            parse_file_id("abc"),
            Err(ProviderError::InvalidId(id)) if id == "abc"
        ));
        assert!(parse_file_id("").is_err());
    }

    #[test]
    fn test_complete_state_marks_job_done() {
        let file: ThreePlayFile = serde_json::from_str(r#"{"id": 42, "state": "complete"}"#).unwrap();
        let job = ProviderJob::from(file);
        assert_eq!(job.provider_id, "42");
        assert_eq!(job.status, "complete");
        assert!(job.done);

        let file: ThreePlayFile =
            serde_json::from_str(r#"{"id": 43, "state": "in_progress", "name": "clip.mp4"}"#).unwrap();
        assert!(!ProviderJob::from(file).done);
    }

    #[test]
    fn test_files_page_tolerates_missing_list() {
        let page: FilesPage = serde_json::from_str(r#"{"summary": {}}"#).unwrap();
        assert!(page.files.is_empty());
    }

    #[test]
    fn test_base_url_is_normalized() {
        assert_eq!(provider().url("/files"), "https://api.3playmedia.com/files");
        assert_eq!(provider().name(), "3play");
    }

    #[tokio::test]
    async fn test_invalid_id_fails_before_any_request() {
        let err = provider().get_job("not-a-number").await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidId(_)));

        let err = provider()
            .download("x1", CaptionFormat::Vtt)
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_cancel_is_unsupported() {
        assert!(!provider().supports_cancel());
        let err = provider().cancel_job("1").await.unwrap_err();
        assert_eq!(err.to_string(), "Provider 3play does not support job cancellation");
    }

    #[tokio::test]
    async fn test_empty_batch_skips_request() {
        assert!(provider().get_jobs(&[]).await.unwrap().is_empty());
    }
}
