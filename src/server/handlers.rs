//! Dashboard HTTP handlers.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use log::error;
use serde_json::json;

use super::AppState;
use crate::error_handling::PipelineError;
use crate::pipeline::Trigger;
use crate::render::render_dashboard;

/// Runs the pipeline and renders the dashboard page.
pub async fn dashboard_handler(State(state): State<AppState>) -> Response {
    match state.pipeline.run(Trigger::Request).await {
        Ok(report) => Html(render_dashboard(&report)).into_response(),
        Err(e) => {
            error!("Dashboard run failed: {}", e);
            (e.status_code(), format!("{}\n", e.user_hint())).into_response()
        }
    }
}

/// Runs the pipeline and returns the report as JSON.
pub async fn api_handler(State(state): State<AppState>) -> Response {
    match state.pipeline.run(Trigger::Request).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => {
            error!("API run failed: {}", e);
            (
                e.status_code(),
                Json(json!({ "error": kind(&e), "hint": e.user_hint() })),
            )
                .into_response()
        }
    }
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

fn kind(error: &PipelineError) -> &'static str {
    match error {
        PipelineError::Config(_) => "config",
        PipelineError::Upstream(_) => "upstream",
        PipelineError::Format(_) => "format",
        PipelineError::Store(_) => "store",
    }
}
