//! Axum Router Configuration
//!
//! This module defines the complete HTTP routing for the application,
//! including the chat API, health check, CORS policy and OpenAPI documentation.

use crate::{
    config::CorsMode,
    handlers,
    models::{
        AgentResponse, ErrorDetail, ErrorResponse, ErrorType, HealthResponse, MessageType,
        PromptRequest, TutorResponseData, WordTip,
    },
    state::AppState,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use regex::Regex;
use std::sync::{Arc, LazyLock};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Browser origins served on port 3000 from loopback or a private network range.
static LOCAL_ORIGIN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^http://(localhost|127\.0\.0\.1|0\.0\.0\.0|192\.168\.\d{1,3}\.\d{1,3}|10\.\d{1,3}\.\d{1,3}\.\d{1,3}|172\.(1[6-9]|2[0-9]|3[0-1])\.\d{1,3}\.\d{1,3}):3000$",
    )
    .expect("origin pattern is valid")
});

#[derive(OpenApi)]
#[openapi(
    paths(handlers::create_chat, handlers::health_check),
    components(
        schemas(PromptRequest, AgentResponse, TutorResponseData, ErrorDetail, WordTip, MessageType, ErrorType, ErrorResponse, HealthResponse)
    ),
    tags(
        (name = "Messaging API", description = "Mediates chat messages to the deployed tutor agent runtime")
    )
)]
pub struct ApiDoc;

pub fn is_local_origin(origin: &HeaderValue) -> bool {
    origin
        .to_str()
        .map(|origin| LOCAL_ORIGIN.is_match(origin))
        .unwrap_or(false)
}

/// Builds the CORS layer for the configured mode.
pub fn cors_layer(mode: &CorsMode) -> CorsLayer {
    match mode {
        CorsMode::LocalNetwork => CorsLayer::new()
            .allow_origin(AllowOrigin::predicate(|origin, _| is_local_origin(origin)))
            .allow_credentials(true)
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request()),
        CorsMode::Open => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
    }
}

/// Creates the main Axum router for the application.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let cors = cors_layer(&app_state.config.cors_mode);

    let api_router = Router::new()
        .route("/api/v1/chat/message", post(handlers::create_chat))
        .with_state(app_state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api_router)
        .route("/health", get(handlers::health_check))
        .layer(cors)
}
