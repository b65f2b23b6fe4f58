use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;
use tutor_core::{AgentError, Message};

use crate::pipeline::{DEFAULT_PROMPT, TutorPipeline};

#[derive(Deserialize, Debug, Default)]
pub struct InvocationPayload {
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Serialize)]
pub struct PingResponse {
    pub status: &'static str,
}

pub struct InvocationError(AgentError);

impl IntoResponse for InvocationError {
    fn into_response(self) -> Response {
        error!(error = ?self.0, "Invocation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                detail: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

impl From<AgentError> for InvocationError {
    fn from(err: AgentError) -> Self {
        Self(err)
    }
}

pub async fn invoke(
    State(pipeline): State<TutorPipeline>,
    Json(payload): Json<InvocationPayload>,
) -> Result<Json<Message>, InvocationError> {
    let prompt = payload.prompt.as_deref().unwrap_or(DEFAULT_PROMPT);
    let reply = pipeline.run(prompt).await?;
    Ok(Json(reply))
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse { status: "Healthy" })
}
