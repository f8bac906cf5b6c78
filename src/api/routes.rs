use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::models::{SummarizeRequest, SummarizeResponse};
use crate::api::response;
use crate::error::PipelineError;
use crate::pipeline::SummaryService;
use crate::AppState;

pub fn create_router<S: SummaryService>(app_state: AppState<S>) -> Router {
    Router::new()
        .route("/api/summarize", post(summarize_handler::<S>))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn summarize_handler<S: SummaryService>(
    State(state): State<AppState<S>>,
    Json(req): Json<SummarizeRequest>,
) -> impl IntoResponse {
    tracing::info!(url = %req.url, "Processing summarize request");
    let start_time = std::time::Instant::now();

    // Set an overall timeout for the entire handler
    let result = tokio::time::timeout(
        state.request_timeout,
        state.service.summarize_url(&req.url),
    )
    .await;

    let elapsed = start_time.elapsed();

    match result {
        Ok(Ok(report)) => {
            tracing::info!(url = %req.url, ?elapsed, source = %report.source, "Summarized URL");
            response::success(SummarizeResponse::from(report))
        }
        Ok(Err(err)) => {
            log_pipeline_error(&err, &req.url);
            response::error(err.status_code(), err.kind(), err.to_string())
        }
        Err(_) => {
            tracing::error!(url = %req.url, ?elapsed, "Request timed out");
            response::error(
                StatusCode::REQUEST_TIMEOUT,
                "timeout",
                "Request processing timed out".to_string(),
            )
        }
    }
}

fn log_pipeline_error(err: &PipelineError, url: &str) {
    match err {
        PipelineError::InvalidInput { .. } => {
            tracing::warn!(url, error = %err, "Rejected input")
        }
        PipelineError::ExtractionFailed { .. } | PipelineError::BackendFailed { .. } => {
            tracing::error!(url, stage = ?err.stage(), error = %err, "Pipeline failed")
        }
    }
}
