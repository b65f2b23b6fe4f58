//! API key resolution.
//!
//! Keys are resolved through an ordered fallback: an explicit value from the
//! agent definition, then an environment variable named after the secret, then
//! a remote secret store. The first non-empty match wins.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use crate::error::SecretError;

/// Default address of the AWS Parameters and Secrets Lambda extension.
pub const DEFAULT_EXTENSION_ENDPOINT: &str = "http://localhost:2773";

const EXTENSION_TOKEN_HEADER: &str = "X-Aws-Parameters-Secrets-Token";

/// A remote store that can look up a string secret by name.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError>;
}

/// Resolves an API key, trying each source in order.
pub async fn resolve_api_key<E>(
    explicit: Option<&str>,
    secret_name: &str,
    env_lookup: E,
    store: &dyn SecretStore,
) -> Result<String, SecretError>
where
    E: Fn(&str) -> Option<String>,
{
    if let Some(key) = explicit.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    if let Some(key) = env_lookup(secret_name).filter(|k| !k.is_empty()) {
        info!(secret = %secret_name, "Retrieved API key from environment variable");
        return Ok(key);
    }

    info!(secret = %secret_name, "Environment variable not found, checking secret store");
    match store.get_secret(secret_name).await {
        Ok(key) => {
            info!(secret = %secret_name, "Retrieved API key from secret store");
            Ok(key)
        }
        Err(e) => {
            error!(secret = %secret_name, error = %e, "Failed to retrieve secret");
            Err(e)
        }
    }
}

/// Reads a variable from the process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// A store with nothing in it, for running without a secret backend.
pub struct NoSecretStore;

#[async_trait]
impl SecretStore for NoSecretStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        Err(SecretError::NotFound(name.to_string()))
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SecretValueResponse {
    secret_string: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParameterResponse {
    parameter: ParameterValue,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ParameterValue {
    value: String,
}

/// Secrets and parameters served by the AWS Parameters and Secrets Lambda
/// extension over its local HTTP interface.
pub struct SecretsExtensionStore {
    client: reqwest::Client,
    endpoint: String,
    session_token: Option<String>,
}

impl SecretsExtensionStore {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>, session_token: Option<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            session_token,
        }
    }

    /// Fetches a parameter store value, e.g. a deployed runtime ARN.
    pub async fn get_parameter(&self, name: &str) -> Result<String, SecretError> {
        let url = format!("{}/systemsmanager/parameters/get", self.endpoint);
        let response: ParameterResponse = self.fetch(&url, &[("name", name)], name).await?;
        Ok(response.parameter.value)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
        name: &str,
    ) -> Result<T, SecretError> {
        let mut request = self.client.get(url).query(query);
        if let Some(token) = &self.session_token {
            request = request.header(EXTENSION_TOKEN_HEADER, token);
        }

        let request_error = |source| SecretError::Request {
            name: name.to_string(),
            source,
        };
        let response = request.send().await.map_err(request_error)?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SecretError::NotFound(name.to_string()));
        }
        if !status.is_success() {
            return Err(SecretError::Status {
                name: name.to_string(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(request_error)
    }
}

#[async_trait]
impl SecretStore for SecretsExtensionStore {
    async fn get_secret(&self, name: &str) -> Result<String, SecretError> {
        let url = format!("{}/secretsmanager/get", self.endpoint);
        let response: SecretValueResponse = self.fetch(&url, &[("secretId", name)], name).await?;
        response
            .secret_string
            .ok_or_else(|| SecretError::NotFound(name.to_string()))
    }
}
