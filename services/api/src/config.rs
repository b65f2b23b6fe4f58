use std::net::SocketAddr;
use tracing::Level;
use tutor_core::secrets::DEFAULT_EXTENSION_ENDPOINT;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Which CORS policy the HTTP surface applies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CorsMode {
    /// Browsers on localhost or a private network address, port 3000.
    LocalNetwork,
    /// Any origin, POST/OPTIONS only.
    Open,
}

/// Where the tutor runtime ARN comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuntimeArnSource {
    Direct(String),
    Parameter(String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub cors_mode: CorsMode,
    pub region: String,
    pub runtime_endpoint: String,
    pub runtime_bearer_token: Option<String>,
    pub tutor_runtime_arn: RuntimeArnSource,
    pub secrets_extension_endpoint: String,
    pub session_token: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("LOGGING_LEVEL").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "LOGGING_LEVEL".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_mode_str = std::env::var("CORS_MODE").unwrap_or_else(|_| "local".to_string());
        let cors_mode = match cors_mode_str.to_lowercase().as_str() {
            "local" => CorsMode::LocalNetwork,
            "open" => CorsMode::Open,
            other => {
                return Err(ConfigError::InvalidValue(
                    "CORS_MODE".to_string(),
                    format!("'{}' is not one of 'local', 'open'", other),
                ));
            }
        };

        let region = std::env::var("AWS_REGION").unwrap_or_else(|_| "eu-central-1".to_string());
        let runtime_endpoint = std::env::var("AGENT_RUNTIME_ENDPOINT")
            .unwrap_or_else(|_| format!("https://bedrock-agentcore.{}.amazonaws.com", region));
        let runtime_bearer_token = std::env::var("AGENT_RUNTIME_BEARER_TOKEN").ok();

        let tutor_runtime_arn = match (
            std::env::var("TUTOR_AGENT_RUNTIME_ARN"),
            std::env::var("TUTOR_AGENT_RUNTIME_ARN_PARAMETER"),
        ) {
            (Ok(arn), _) => RuntimeArnSource::Direct(arn),
            (Err(_), Ok(parameter)) => RuntimeArnSource::Parameter(parameter),
            (Err(_), Err(_)) => {
                return Err(ConfigError::MissingVar(
                    "TUTOR_AGENT_RUNTIME_ARN or TUTOR_AGENT_RUNTIME_ARN_PARAMETER must be set"
                        .to_string(),
                ));
            }
        };

        let secrets_extension_endpoint = std::env::var("SECRETS_EXTENSION_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_EXTENSION_ENDPOINT.to_string());
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(Self {
            bind_address,
            log_level,
            cors_mode,
            region,
            runtime_endpoint,
            runtime_bearer_token,
            tutor_runtime_arn,
            secrets_extension_endpoint,
            session_token,
        })
    }
}
