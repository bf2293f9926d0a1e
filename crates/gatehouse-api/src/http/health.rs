//! Operational endpoints: liveness, Prometheus scrape, JSON 404.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, Uri, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use gatehouse_telemetry::build_sha;
use tracing::error;

use crate::http::constants::CONTENT_TYPE_PROMETHEUS;
use crate::http::errors::ApiError;
use crate::models::HealthResponse;
use crate::state::ApiState;

pub(crate) async fn health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build: build_sha(),
        logins: state.telemetry.snapshot(),
    })
}

pub(crate) async fn metrics(State(state): State<ApiState>) -> Result<Response, ApiError> {
    match state.telemetry.render() {
        Ok(body) => Ok((
            StatusCode::OK,
            [(CONTENT_TYPE, CONTENT_TYPE_PROMETHEUS)],
            body,
        )
            .into_response()),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            Err(ApiError::internal("failed to render metrics"))
        }
    }
}

pub(crate) async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("no route for {}", uri.path()))
}
