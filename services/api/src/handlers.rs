//! Axum Handlers for the REST API
//!
//! This module contains the logic for handling chat and health requests.
//! It uses `utoipa` doc comments to generate OpenAPI documentation.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::error;

use crate::{
    error::MessagingError,
    models::{AgentResponse, ErrorResponse, HealthResponse, PromptRequest},
    state::AppState,
};

/// Every mediation failure surfaces as a generic server error carrying the
/// error message as `detail`.
pub struct ApiError(MessagingError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = ?self.0, "Chat request failed");
        let detail = self.0.to_string();
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { detail }),
        )
            .into_response()
    }
}

impl From<MessagingError> for ApiError {
    fn from(err: MessagingError) -> Self {
        Self(err)
    }
}

/// Send a message to the tutor agent.
#[utoipa::path(
    post,
    path = "/api/v1/chat/message",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Structured reply from the tutor agent", body = AgentResponse),
        (status = 500, description = "Agent invocation or response processing failed", body = ErrorResponse)
    )
)]
pub async fn create_chat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PromptRequest>,
) -> Result<Json<AgentResponse>, ApiError> {
    let runtime = state.tutor_runtime.as_ref();

    let response = state.agent_service.invoke_agent(runtime, &request).await?;
    let session_id = response.session_id.clone();

    let agent_response = state
        .agent_service
        .generate_agent_response(response, runtime, &session_id)
        .await?;

    Ok(Json(agent_response))
}

/// Health check.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
    })
}
