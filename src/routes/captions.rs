use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use garde::Validate;
use serde_json::json;

use crate::app_state::AppState;
use crate::models::format::CaptionFormat;
use crate::models::job::{Job, JobSummary};
use crate::models::request::{CancelResponse, FormatQuery, JobRequest};
use crate::services::client::ClientError;

/// Error returned by caption handlers, rendered as `{"error": "..."}`.
#[derive(Debug)]
pub enum ApiError {
    Client(ClientError),
    Invalid(String),
    UnsupportedFormat(String),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        ApiError::Client(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Client(err) => {
                let status = match &err {
                    ClientError::JobNotFound => StatusCode::NOT_FOUND,
                    ClientError::ProviderNotFound
                    | ClientError::NotDispatched(_)
                    | ClientError::Transcript(_) => StatusCode::BAD_REQUEST,
                    ClientError::Provider(_) => StatusCode::BAD_GATEWAY,
                    ClientError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(error = %err, "Caption request failed");
                }
                (status, err.to_string())
            }
            ApiError::Invalid(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            ApiError::UnsupportedFormat(format) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported caption format: {format}"),
            ),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// POST /captions — create and dispatch one job per requested language.
pub async fn dispatch_captions(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Result<(StatusCode, Json<Vec<Job>>), ApiError> {
    request
        .validate()
        .map_err(|report| ApiError::Invalid(report.to_string()))?;

    let jobs = state.client.dispatch_request(&request).await?;
    Ok((StatusCode::CREATED, Json(jobs)))
}

/// GET /captions/{id} — job with a freshly polled status.
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    Ok(Json(state.client.get_job(&id).await?))
}

/// GET /jobs/{parent_id} — every job of a request, newest first.
pub async fn get_jobs(
    State(state): State<AppState>,
    Path(parent_id): Path<String>,
) -> Result<Json<Vec<JobSummary>>, ApiError> {
    Ok(Json(state.client.get_jobs(&parent_id).await?))
}

/// DELETE /captions/{id} — cancel an in-flight job.
pub async fn cancel_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    let canceled = state.client.cancel_job(&id).await?;
    Ok(Json(CancelResponse { canceled }))
}

/// GET /captions/{id}/download?format=vtt — raw caption file from the vendor.
pub async fn download_caption(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let format: CaptionFormat = query
        .format
        .parse()
        .map_err(|_| ApiError::UnsupportedFormat(query.format.clone()))?;

    let caption = state.client.download_caption(&id, format).await?;
    let content_type = match format {
        CaptionFormat::Vtt => "text/vtt; charset=utf-8",
        _ => "text/plain; charset=utf-8",
    };

    Ok(([(header::CONTENT_TYPE, content_type)], caption).into_response())
}

/// GET /captions/{id}/transcript?format=vtt — plain-text transcript of the job's captions.
pub async fn get_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<FormatQuery>,
) -> Result<Response, ApiError> {
    let transcript = state
        .client
        .generate_job_transcript(&id, &query.format)
        .await?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        transcript,
    )
        .into_response())
}
