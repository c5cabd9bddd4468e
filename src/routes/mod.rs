use axum::routing::get;
use axum::Router;

use crate::app_state::AppState;

pub mod captions;
pub mod health;
pub mod metrics;

/// Caption API routes. Metrics and HTTP layers are added by the server binary.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/captions", axum::routing::post(captions::dispatch_captions))
        .route(
            "/captions/{id}",
            get(captions::get_job).delete(captions::cancel_job),
        )
        .route("/captions/{id}/download", get(captions::download_caption))
        .route("/captions/{id}/transcript", get(captions::get_transcript))
        .route("/jobs/{parent_id}", get(captions::get_jobs))
        .with_state(state)
}
