//! Main Entrypoint for the Tutor Agent Runtime
//!
//! Builds every configured agent once, then serves invocations until shutdown.

use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tutor_core::{
    config::AgentConfig, factory::AgentFactory, registry::AgentRegistry,
    secrets::SecretsExtensionStore,
};
use tutor_runtime::{config::Config, pipeline::TutorPipeline, router::create_router};

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();

    let agent_config = AgentConfig::load(&config.agent_config_path)?;
    let secret_store = SecretsExtensionStore::new(
        reqwest::Client::new(),
        config.secrets_extension_endpoint.clone(),
        config.session_token.clone(),
    );
    let factory = AgentFactory::new(Arc::new(secret_store));
    let registry = AgentRegistry::build(&agent_config, &factory)
        .await
        .context("Failed to build agents")?;
    let pipeline = TutorPipeline::from_registry(&registry)?;

    info!(bind_address = %config.bind_address, agents = registry.len(), "Agents ready. Starting runtime...");
    let listener = tokio::net::TcpListener::bind(config.bind_address).await?;
    axum::serve(listener, create_router(pipeline))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Runtime has shut down.");
    Ok(())
}
