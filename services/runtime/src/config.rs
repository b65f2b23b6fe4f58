use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;
use tutor_core::secrets::DEFAULT_EXTENSION_ENDPOINT;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub agent_config_path: PathBuf,
    pub secrets_extension_endpoint: String,
    pub session_token: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // The hosting service routes invocations to port 8080.
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
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

        let agent_config_path = std::env::var("AGENT_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("agent_config.json"));

        let secrets_extension_endpoint = std::env::var("SECRETS_EXTENSION_ENDPOINT")
            .unwrap_or_else(|_| DEFAULT_EXTENSION_ENDPOINT.to_string());
        let session_token = std::env::var("AWS_SESSION_TOKEN").ok();

        Ok(Self {
            bind_address,
            log_level,
            agent_config_path,
            secrets_extension_endpoint,
            session_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("LOGGING_LEVEL");
            env::remove_var("AGENT_CONFIG_PATH");
            env::remove_var("SECRETS_EXTENSION_ENDPOINT");
            env::remove_var("AWS_SESSION_TOKEN");
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env_vars();
        let config = Config::from_env().unwrap();

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.agent_config_path, PathBuf::from("agent_config.json"));
        assert_eq!(config.secrets_extension_endpoint, "http://localhost:2773");
        assert_eq!(config.session_token, None);
    }

    #[test]
    #[serial]
    fn test_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:9090");
            env::set_var("LOGGING_LEVEL", "warn");
            env::set_var("AGENT_CONFIG_PATH", "/etc/tutor/agents.json");
        }

        let config = Config::from_env().unwrap();
        assert_eq!(config.bind_address.to_string(), "127.0.0.1:9090");
        assert_eq!(config.log_level, Level::WARN);
        assert_eq!(config.agent_config_path, PathBuf::from("/etc/tutor/agents.json"));
    }

    #[test]
    #[serial]
    fn test_invalid_log_level() {
        clear_env_vars();
        unsafe {
            env::set_var("LOGGING_LEVEL", "loud");
        }

        match Config::from_env().unwrap_err() {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "LOGGING_LEVEL"),
        }
    }
}
