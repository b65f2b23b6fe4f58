//! Main Entrypoint for the Messaging API Service
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Resolving the tutor runtime reference.
//! 3. Initializing the runtime invocation client and mediation service.
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tutor_api::{
    client::HttpAgentRuntimeClient,
    config::Config,
    router::create_router,
    runtime::Runtime,
    service::AgentCommunicationService,
    state::AppState,
};
use tutor_core::secrets::SecretsExtensionStore;

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!("Configuration loaded. Initializing application state...");

    // --- 3. Resolve Runtime Reference ---
    let http = reqwest::Client::new();
    let parameters = SecretsExtensionStore::new(
        http.clone(),
        config.secrets_extension_endpoint.clone(),
        config.session_token.clone(),
    );
    let tutor_runtime = Runtime::resolve_tutor(&config.tutor_runtime_arn, &parameters)
        .await
        .context("Failed to resolve tutor runtime ARN")?;

    // --- 4. Initialize Shared Services ---
    let client = HttpAgentRuntimeClient::new(
        http,
        config.runtime_endpoint.clone(),
        config.runtime_bearer_token.clone(),
    );
    let app_state = Arc::new(AppState {
        agent_service: Arc::new(AgentCommunicationService::new(Arc::new(client))),
        tutor_runtime: Arc::new(tutor_runtime),
        config: Arc::new(config.clone()),
    });

    // --- 5. Create Router ---
    let app = create_router(app_state);

    // --- 6. Start Server ---
    info!(
        region = %config.region,
        cors = ?config.cors_mode,
        bind_address = %config.bind_address,
        "Service configured. Starting server..."
    );
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server has shut down.");
    Ok(())
}
