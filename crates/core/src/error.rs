use std::path::PathBuf;

use crate::agent::AgentKind;

/// Failures raised while configuring, constructing or running an agent.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(PathBuf),
    #[error("Invalid agent configuration in {path}: {message}")]
    InvalidConfig { path: PathBuf, message: String },
    #[error("Agent configuration '{0}' not found")]
    UnknownAgent(String),
    #[error("Failed to load prompt from {path}: {source}")]
    PromptNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("API key '{secret_name}' not found in parameters, environment or secret store: {source}")]
    MissingApiKey {
        secret_name: String,
        #[source]
        source: SecretError,
    },
    #[error("{expected} agent cannot process {received} input")]
    InvalidInput {
        expected: AgentKind,
        received: &'static str,
    },
    #[error("Agent '{name}' is a {actual} agent, expected {expected}")]
    WrongKind {
        name: String,
        expected: AgentKind,
        actual: AgentKind,
    },
    #[error("Model call failed: {0}")]
    Model(#[source] anyhow::Error),
}

/// Failures raised by a secret or parameter lookup.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Secret '{0}' not found")]
    NotFound(String),
    #[error("Secret store request for '{name}' failed: {source}")]
    Request {
        name: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Secret store returned status {status} for '{name}'")]
    Status { name: String, status: u16 },
}
