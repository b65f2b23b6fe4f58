use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, pipeline::TutorPipeline};

/// Routes expected by the agent-runtime hosting service.
pub fn create_router(pipeline: TutorPipeline) -> Router {
    Router::new()
        .route("/invocations", post(handlers::invoke))
        .route("/ping", get(handlers::ping))
        .with_state(pipeline)
}
